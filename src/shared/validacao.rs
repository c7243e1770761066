// src/shared/validacao.rs

use bigdecimal::BigDecimal;

use super::erros::{ErroEstoque, Motivo};

/// Valida um texto obrigatório: remove espaços das pontas, rejeita vazio e
/// limita o tamanho em caracteres.
pub fn texto_obrigatorio(
    campo: &'static str,
    valor: Option<&str>,
    maximo: usize,
) -> Result<String, ErroEstoque> {
    let valor = valor.ok_or_else(|| ErroEstoque::entrada_invalida(campo, Motivo::Obrigatorio))?;
    let valor = valor.trim();
    if valor.is_empty() {
        return Err(ErroEstoque::entrada_invalida(campo, Motivo::Vazio));
    }
    limitar(campo, valor, maximo)?;
    Ok(valor.to_string())
}

/// Valida um texto opcional apenas pelo tamanho.
pub fn texto_opcional(
    campo: &'static str,
    valor: Option<String>,
    maximo: usize,
) -> Result<Option<String>, ErroEstoque> {
    if let Some(texto) = &valor {
        limitar(campo, texto, maximo)?;
    }
    Ok(valor)
}

fn limitar(campo: &'static str, valor: &str, maximo: usize) -> Result<(), ErroEstoque> {
    if valor.chars().count() > maximo {
        return Err(ErroEstoque::entrada_invalida(campo, Motivo::MuitoLongo { maximo }));
    }
    Ok(())
}

/// Inteiro que não pode ser negativo (estoque atual, estoque mínimo).
pub fn nao_negativo(campo: &'static str, valor: i32) -> Result<i32, ErroEstoque> {
    if valor < 0 {
        return Err(ErroEstoque::entrada_invalida(campo, Motivo::Negativo));
    }
    Ok(valor)
}

/// Peso entre 0 e 999999.99 (NUMERIC(8,2)).
pub fn peso(valor: Option<BigDecimal>) -> Result<Option<BigDecimal>, ErroEstoque> {
    if let Some(peso) = &valor {
        let maximo = BigDecimal::new(99_999_999.into(), 2);
        if *peso < BigDecimal::from(0) || *peso > maximo {
            return Err(ErroEstoque::entrada_invalida("peso", Motivo::ForaDoIntervalo));
        }
    }
    Ok(valor)
}
