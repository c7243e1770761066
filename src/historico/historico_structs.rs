// src/historico/historico_structs.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::movimentacoes::movimentacoes_structs::{tipo_da_linha, TipoMovimentacao};

/// Fotografia do saldo antes e depois de uma movimentação.
/// Só existe como dependente de uma movimentação.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RegistroHistorico {
    pub id: i32,
    pub id_movimentacao: i32,
    pub estoque_anterior: i32,
    pub estoque_posterior: i32,
}

/// Registro de histórico com os dados da movimentação que o originou.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricoDetalhado {
    #[serde(flatten)]
    pub registro: RegistroHistorico,
    pub tipo: TipoMovimentacao,
    pub quantidade: i32,
    pub data_movimentacao: DateTime<Utc>,
    pub observacao: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for HistoricoDetalhado {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(HistoricoDetalhado {
            registro: RegistroHistorico::from_row(row)?,
            tipo: tipo_da_linha(row)?,
            quantidade: row.try_get("quantidade")?,
            data_movimentacao: row.try_get("data_movimentacao")?,
            observacao: row.try_get("observacao")?,
        })
    }
}
