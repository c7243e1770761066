// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erros::ErroEstoque;
use crate::shared::validacao;

/// Tamanho máximo do nome da categoria.
pub const NOME_MAX: usize = 100;

/// Estrutura para receber dados de uma nova categoria na requisição POST/PUT
#[derive(Deserialize)]
pub struct NovaCategoria {
    pub nome: Option<String>,
}

impl NovaCategoria {
    /// Retorna o nome já validado (sem espaços nas pontas, 1 a 100 caracteres).
    pub fn validar(&self) -> Result<String, ErroEstoque> {
        validacao::texto_obrigatorio("nome", self.nome.as_deref(), NOME_MAX)
    }
}

/// Estrutura que representa uma categoria no banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nome: String,
}

/// Resultado de uma atualização de categoria.
/// `modificada` é falso quando o nome enviado já era o nome atual.
#[derive(Debug, Serialize)]
pub struct CategoriaAtualizada {
    pub categoria: Categoria,
    pub modificada: bool,
    pub nome_anterior: String,
}
