// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::movimentacoes::movimentacoes_structs::MovimentacaoRegistrada;
use crate::shared::erros::{ErroEstoque, Motivo};
use crate::shared::shared_structs::campo_anulavel;
use crate::shared::validacao;

pub const NOME_MAX: usize = 200;
pub const MATERIAL_MAX: usize = 100;
pub const TAMANHO_MAX: usize = 50;

/// Estrutura que representa um produto no banco de dados,
/// já com o nome da categoria (LEFT JOIN em `categorias`).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub id_categoria: Option<i32>,
    pub categoria_nome: Option<String>,
    pub material: Option<String>,
    pub tamanho: Option<String>,
    pub peso: Option<BigDecimal>,
    pub estoque_atual: i32,
    pub estoque_minimo: i32,
    pub ativo: bool,
}

/// Estrutura para receber dados do novo produto na requisição POST
#[derive(Deserialize)]
pub struct NovoProdutoRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub id_categoria: Option<i32>,
    pub material: Option<String>,
    pub tamanho: Option<String>,
    pub peso: Option<BigDecimal>,
    pub estoque_atual: Option<i32>,
    pub estoque_minimo: Option<i32>,
}

/// Dados validados para inserir um produto.
#[derive(Debug, Clone, PartialEq)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: Option<String>,
    pub id_categoria: Option<i32>,
    pub material: Option<String>,
    pub tamanho: Option<String>,
    pub peso: Option<BigDecimal>,
    pub estoque_atual: i32,
    pub estoque_minimo: i32,
}

impl NovoProdutoRequest {
    pub fn validar(self) -> Result<NovoProduto, ErroEstoque> {
        let nome = validacao::texto_obrigatorio("nome", self.nome.as_deref(), NOME_MAX)?;
        let estoque_minimo = self
            .estoque_minimo
            .ok_or_else(|| ErroEstoque::entrada_invalida("estoque_minimo", Motivo::Obrigatorio))?;

        Ok(NovoProduto {
            nome,
            descricao: self.descricao,
            id_categoria: self.id_categoria,
            material: validacao::texto_opcional("material", self.material, MATERIAL_MAX)?,
            tamanho: validacao::texto_opcional("tamanho", self.tamanho, TAMANHO_MAX)?,
            peso: validacao::peso(self.peso)?,
            estoque_atual: validacao::nao_negativo("estoque_atual", self.estoque_atual.unwrap_or(0))?,
            estoque_minimo: validacao::nao_negativo("estoque_minimo", estoque_minimo)?,
        })
    }
}

/// Corpo do PUT /produtos/{id}. Campos ausentes não são alterados;
/// `null` limpa os campos anuláveis.
#[derive(Deserialize, Default)]
pub struct AtualizacaoProdutoRequest {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub descricao: Option<Option<String>>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub id_categoria: Option<Option<i32>>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub material: Option<Option<String>>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub tamanho: Option<Option<String>>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub peso: Option<Option<BigDecimal>>,
    #[serde(default)]
    pub estoque_minimo: Option<i32>,
    // Recebidos apenas para serem rejeitados
    #[serde(default)]
    pub estoque_atual: Option<Value>,
    #[serde(default)]
    pub ativo: Option<Value>,
}

/// Conjunto explícito de campos a alterar em um produto.
///
/// Só contém atributos cadastrais: o estoque muda apenas pelo livro de
/// movimentações e a reativação não faz parte da API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlteracoesProduto {
    pub nome: Option<String>,
    pub descricao: Option<Option<String>>,
    pub id_categoria: Option<Option<i32>>,
    pub material: Option<Option<String>>,
    pub tamanho: Option<Option<String>>,
    pub peso: Option<Option<BigDecimal>>,
    pub estoque_minimo: Option<i32>,
}

impl AlteracoesProduto {
    pub fn esta_vazia(&self) -> bool {
        self.quantidade_de_campos() == 0
    }

    pub fn quantidade_de_campos(&self) -> usize {
        [
            self.nome.is_some(),
            self.descricao.is_some(),
            self.id_categoria.is_some(),
            self.material.is_some(),
            self.tamanho.is_some(),
            self.peso.is_some(),
            self.estoque_minimo.is_some(),
        ]
        .iter()
        .filter(|presente| **presente)
        .count()
    }
}

impl AtualizacaoProdutoRequest {
    pub fn validar(self) -> Result<AlteracoesProduto, ErroEstoque> {
        if self.estoque_atual.is_some() {
            return Err(ErroEstoque::entrada_invalida("estoque_atual", Motivo::NaoAlteravel));
        }
        if self.ativo.is_some() {
            return Err(ErroEstoque::entrada_invalida("ativo", Motivo::NaoAlteravel));
        }

        let nome = match self.nome {
            Some(nome) => Some(validacao::texto_obrigatorio("nome", Some(&nome), NOME_MAX)?),
            None => None,
        };
        let material = match self.material {
            Some(material) => Some(validacao::texto_opcional("material", material, MATERIAL_MAX)?),
            None => None,
        };
        let tamanho = match self.tamanho {
            Some(tamanho) => Some(validacao::texto_opcional("tamanho", tamanho, TAMANHO_MAX)?),
            None => None,
        };
        let peso = match self.peso {
            Some(peso) => Some(validacao::peso(peso)?),
            None => None,
        };
        let estoque_minimo = match self.estoque_minimo {
            Some(minimo) => Some(validacao::nao_negativo("estoque_minimo", minimo)?),
            None => None,
        };

        let alteracoes = AlteracoesProduto {
            nome,
            descricao: self.descricao,
            id_categoria: self.id_categoria,
            material,
            tamanho,
            peso,
            estoque_minimo,
        };

        if alteracoes.esta_vazia() {
            return Err(ErroEstoque::entrada_invalida("body", Motivo::SemAlteracoes));
        }
        Ok(alteracoes)
    }
}

/// Corpo do PATCH /produtos/{id}/estoque.
#[derive(Deserialize)]
pub struct AjusteEstoqueRequest {
    pub estoque_atual: Option<i64>,
}

/// Resultado do ajuste manual. Sem diferença, nada é lançado e
/// `lancamento` fica vazio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjusteEstoque {
    pub id_produto: i32,
    pub nome: String,
    pub estoque_anterior: i32,
    pub estoque_atual: i32,
    pub diferenca: i64,
    /// "entrada", "saida" ou "sem alteração".
    pub tipo_operacao: &'static str,
    pub lancamento: Option<MovimentacaoRegistrada>,
}

/// Filtros das consultas de produtos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FiltroProdutos {
    pub id_categoria: Option<i32>,
    pub somente_ativos: bool,
    /// Apenas produtos com estoque_atual <= estoque_minimo.
    pub estoque_baixo: bool,
    pub ordem: OrdemProdutos,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrdemProdutos {
    #[default]
    Id,
    Nome,
    EstoqueCrescente,
}

/// Query string de GET /produtos.
#[derive(Deserialize)]
pub struct ConsultaProdutos {
    pub categoria: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novo_request() -> NovoProdutoRequest {
        NovoProdutoRequest {
            nome: Some(" Bolsa de couro ".into()),
            descricao: None,
            id_categoria: Some(1),
            material: Some("couro".into()),
            tamanho: Some("M".into()),
            peso: None,
            estoque_atual: None,
            estoque_minimo: Some(0),
        }
    }

    #[test]
    fn novo_produto_aceita_estoque_minimo_zero_e_estoque_padrao() {
        let novo = novo_request().validar().unwrap();
        assert_eq!(novo.nome, "Bolsa de couro");
        assert_eq!(novo.estoque_atual, 0);
        assert_eq!(novo.estoque_minimo, 0);
    }

    #[test]
    fn novo_produto_exige_estoque_minimo() {
        let mut request = novo_request();
        request.estoque_minimo = None;
        let erro = request.validar().unwrap_err();
        assert!(matches!(
            erro,
            ErroEstoque::EntradaInvalida { campo: "estoque_minimo", motivo: Motivo::Obrigatorio }
        ));
    }

    #[test]
    fn novo_produto_rejeita_estoque_negativo() {
        let mut request = novo_request();
        request.estoque_atual = Some(-1);
        assert!(request.validar().is_err());
    }

    #[test]
    fn atualizacao_rejeita_estoque_e_ativo() {
        let corpo: AtualizacaoProdutoRequest =
            serde_json::from_str(r#"{"nome": "Novo", "estoque_atual": 50}"#).unwrap();
        let erro = corpo.validar().unwrap_err();
        assert!(matches!(
            erro,
            ErroEstoque::EntradaInvalida { campo: "estoque_atual", motivo: Motivo::NaoAlteravel }
        ));

        let corpo: AtualizacaoProdutoRequest = serde_json::from_str(r#"{"ativo": 1}"#).unwrap();
        assert!(corpo.validar().is_err());
    }

    #[test]
    fn atualizacao_vazia_e_invalida() {
        let corpo: AtualizacaoProdutoRequest = serde_json::from_str("{}").unwrap();
        let erro = corpo.validar().unwrap_err();
        assert!(matches!(erro, ErroEstoque::EntradaInvalida { motivo: Motivo::SemAlteracoes, .. }));
    }

    #[test]
    fn atualizacao_lista_apenas_campos_enviados() {
        let corpo: AtualizacaoProdutoRequest =
            serde_json::from_str(r#"{"material": null, "estoque_minimo": 3}"#).unwrap();
        let alteracoes = corpo.validar().unwrap();
        assert_eq!(alteracoes.quantidade_de_campos(), 2);
        assert_eq!(alteracoes.material, Some(None));
        assert_eq!(alteracoes.estoque_minimo, Some(3));
        assert_eq!(alteracoes.nome, None);
    }
}
