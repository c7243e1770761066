// src/movimentacoes/movimentacoes_structs.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use thiserror::Error;

use crate::historico::historico_structs::RegistroHistorico;
use crate::shared::erros::{ErroEstoque, Motivo};

/// Direção de uma movimentação de estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Entrada,
    Saida,
}

#[derive(Debug, Error)]
#[error("tipo de movimentação desconhecido: {0}")]
pub struct TipoDesconhecido(pub String);

impl TipoMovimentacao {
    pub fn como_str(&self) -> &'static str {
        match self {
            TipoMovimentacao::Entrada => "entrada",
            TipoMovimentacao::Saida => "saida",
        }
    }
}

impl FromStr for TipoMovimentacao {
    type Err = TipoDesconhecido;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(TipoMovimentacao::Entrada),
            "saida" => Ok(TipoMovimentacao::Saida),
            outro => Err(TipoDesconhecido(outro.to_string())),
        }
    }
}

impl fmt::Display for TipoMovimentacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.como_str())
    }
}

/// Lê a coluna `tipo` (VARCHAR) de uma linha do banco.
pub(crate) fn tipo_da_linha(row: &PgRow) -> Result<TipoMovimentacao, sqlx::Error> {
    let tipo: String = row.try_get("tipo")?;
    tipo.parse().map_err(|e: TipoDesconhecido| sqlx::Error::ColumnDecode {
        index: "tipo".to_string(),
        source: Box::new(e),
    })
}

/// Estrutura que representa uma movimentação no banco de dados.
/// Movimentações não são alteradas depois de gravadas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movimentacao {
    pub id: i32,
    pub id_produto: i32,
    pub tipo: TipoMovimentacao,
    pub quantidade: i32,
    pub data_movimentacao: DateTime<Utc>,
    pub observacao: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for Movimentacao {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Movimentacao {
            id: row.try_get("id")?,
            id_produto: row.try_get("id_produto")?,
            tipo: tipo_da_linha(row)?,
            quantidade: row.try_get("quantidade")?,
            data_movimentacao: row.try_get("data_movimentacao")?,
            observacao: row.try_get("observacao")?,
        })
    }
}

/// Movimentação acompanhada dos dados do produto e do nome da categoria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovimentacaoCompleta {
    #[serde(flatten)]
    pub movimentacao: Movimentacao,
    pub produto_nome: String,
    pub produto_descricao: Option<String>,
    pub categoria_nome: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for MovimentacaoCompleta {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(MovimentacaoCompleta {
            movimentacao: Movimentacao::from_row(row)?,
            produto_nome: row.try_get("produto_nome")?,
            produto_descricao: row.try_get("produto_descricao")?,
            categoria_nome: row.try_get("categoria_nome")?,
        })
    }
}

/// Corpo do POST /movimentacoes.
#[derive(Deserialize)]
pub struct NovaMovimentacaoRequest {
    pub id_produto: Option<i32>,
    pub tipo: Option<String>,
    pub quantidade: Option<i64>,
    pub observacao: Option<String>,
}

/// Movimentação solicitada, já com o tipo reconhecido.
/// A quantidade é conferida pelo livro de movimentações.
#[derive(Debug, Clone, PartialEq)]
pub struct NovaMovimentacao {
    pub id_produto: i32,
    pub tipo: TipoMovimentacao,
    pub quantidade: i64,
    pub observacao: Option<String>,
}

impl NovaMovimentacaoRequest {
    pub fn validar(self) -> Result<NovaMovimentacao, ErroEstoque> {
        let id_produto = self
            .id_produto
            .ok_or_else(|| ErroEstoque::entrada_invalida("id_produto", Motivo::Obrigatorio))?;
        let tipo = self
            .tipo
            .ok_or_else(|| ErroEstoque::entrada_invalida("tipo", Motivo::Obrigatorio))?;
        let tipo = tipo
            .parse::<TipoMovimentacao>()
            .map_err(|TipoDesconhecido(tipo)| ErroEstoque::entrada_invalida("tipo", Motivo::TipoDesconhecido(tipo)))?;
        let quantidade = self
            .quantidade
            .ok_or_else(|| ErroEstoque::entrada_invalida("quantidade", Motivo::Obrigatorio))?;

        Ok(NovaMovimentacao {
            id_produto,
            tipo,
            quantidade,
            observacao: self.observacao,
        })
    }
}

/// Dados gravados de uma movimentação recém-criada.
#[derive(Debug, Clone, PartialEq)]
pub struct DadosMovimentacao {
    pub id_produto: i32,
    pub tipo: TipoMovimentacao,
    pub quantidade: i32,
    pub data_movimentacao: DateTime<Utc>,
    pub observacao: Option<String>,
}

/// Resultado do registro: a movimentação e seu registro de histórico.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovimentacaoRegistrada {
    pub movimentacao: Movimentacao,
    pub historico: RegistroHistorico,
}

impl MovimentacaoRegistrada {
    /// "+5" para entradas, "-5" para saídas.
    pub fn diferenca(&self) -> String {
        match self.movimentacao.tipo {
            TipoMovimentacao::Entrada => format!("+{}", self.movimentacao.quantidade),
            TipoMovimentacao::Saida => format!("-{}", self.movimentacao.quantidade),
        }
    }
}

/// Resultado da exclusão de uma movimentação.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovimentacaoExcluida {
    pub movimentacao: Movimentacao,
    pub historico_removido: bool,
}

/// Resultado de exclusões em lote por produto.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExclusaoEmLote {
    pub id_produto: i32,
    pub produto: String,
    pub removidos: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_aceita_somente_entrada_e_saida() {
        assert_eq!("entrada".parse::<TipoMovimentacao>().unwrap(), TipoMovimentacao::Entrada);
        assert_eq!("saida".parse::<TipoMovimentacao>().unwrap(), TipoMovimentacao::Saida);
        assert!("saída".parse::<TipoMovimentacao>().is_err());
        assert!("ENTRADA".parse::<TipoMovimentacao>().is_err());
    }

    #[test]
    fn request_com_tipo_desconhecido_e_entrada_invalida() {
        let request = NovaMovimentacaoRequest {
            id_produto: Some(1),
            tipo: Some("transferencia".into()),
            quantidade: Some(3),
            observacao: None,
        };
        let erro = request.validar().unwrap_err();
        assert!(matches!(
            erro,
            ErroEstoque::EntradaInvalida { campo: "tipo", motivo: Motivo::TipoDesconhecido(ref t) } if t == "transferencia"
        ));
    }

    #[test]
    fn request_sem_produto_e_entrada_invalida() {
        let request = NovaMovimentacaoRequest {
            id_produto: None,
            tipo: Some("entrada".into()),
            quantidade: Some(3),
            observacao: None,
        };
        assert!(matches!(
            request.validar(),
            Err(ErroEstoque::EntradaInvalida { campo: "id_produto", .. })
        ));
    }

    #[test]
    fn movimentacao_completa_serializa_sem_aninhar() {
        let completa = MovimentacaoCompleta {
            movimentacao: Movimentacao {
                id: 3,
                id_produto: 1,
                tipo: TipoMovimentacao::Entrada,
                quantidade: 5,
                data_movimentacao: Utc::now(),
                observacao: None,
            },
            produto_nome: "Bolsa".into(),
            produto_descricao: None,
            categoria_nome: Some("Bolsas".into()),
        };
        let json = serde_json::to_value(&completa).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["tipo"], "entrada");
        assert_eq!(json["produto_nome"], "Bolsa");
        assert_eq!(json["categoria_nome"], "Bolsas");
        assert!(json.get("movimentacao").is_none());
    }

    #[test]
    fn tipo_serializa_em_minusculas() {
        assert_eq!(serde_json::to_value(TipoMovimentacao::Saida).unwrap(), "saida");
    }
}
