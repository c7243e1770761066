// src/armazenamento/mod.rs

//! Acesso transacional às quatro tabelas do estoque.
//!
//! Todo acesso passa por uma [`Transacao`]: os motores de movimentação e de
//! exclusão leem, verificam e gravam dentro da mesma transação, e só então
//! confirmam ou desfazem tudo.

use async_trait::async_trait;
use thiserror::Error;

use crate::categorias::categoria_structs::Categoria;
use crate::historico::historico_structs::{HistoricoDetalhado, RegistroHistorico};
use crate::movimentacoes::movimentacoes_structs::{DadosMovimentacao, Movimentacao, MovimentacaoCompleta};
use crate::produtos::produtos_structs::{AlteracoesProduto, FiltroProdutos, NovoProduto, Produto};

pub mod armazenamento_postgres;
#[cfg(test)]
pub mod armazenamento_memoria;

/// Falha de conexão ou de transação com o banco.
#[derive(Debug, Error)]
pub enum ErroArmazenamento {
    /// Erro permanente do banco (restrição violada, SQL inválido, tipo errado).
    #[error(transparent)]
    Banco(sqlx::Error),
    /// Violação de unicidade; carrega o nome da restrição.
    #[error("valor duplicado (restrição {0})")]
    Duplicado(String),
    /// Conexão, pool ou conflito de serialização: repetir pode dar certo.
    #[error("armazenamento indisponível: {0}")]
    Indisponivel(String),
}

impl ErroArmazenamento {
    /// A mesma operação, repetida depois, pode ter sucesso.
    pub fn temporario(&self) -> bool {
        matches!(self, ErroArmazenamento::Indisponivel(_))
    }
}

// SQLSTATE: 23505 unique_violation, 40001 serialization_failure, 40P01 deadlock_detected
impl From<sqlx::Error> for ErroArmazenamento {
    fn from(erro: sqlx::Error) -> Self {
        if let sqlx::Error::Database(banco) = &erro {
            match banco.code().as_deref() {
                Some("23505") => {
                    return ErroArmazenamento::Duplicado(banco.constraint().unwrap_or_default().to_string())
                }
                Some("40001") | Some("40P01") => return ErroArmazenamento::Indisponivel(banco.to_string()),
                _ => {}
            }
        }
        match erro {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => ErroArmazenamento::Indisponivel(erro.to_string()),
            outro => ErroArmazenamento::Banco(outro),
        }
    }
}


pub type ResultadoArmazenamento<T> = Result<T, ErroArmazenamento>;

#[async_trait]
pub trait Armazenamento: Send + Sync {
    async fn iniciar(&self) -> ResultadoArmazenamento<Box<dyn Transacao>>;

    async fn verificar_conexao(&self) -> ResultadoArmazenamento<()>;
}

/// Uma transação aberta. Descartar sem `confirmar` desfaz as escritas.
///
/// Os métodos `bloquear_*` leem a linha com bloqueio de escrita, de modo que
/// outra transação que queira a mesma linha espera a confirmação desta.
#[async_trait]
pub trait Transacao: Send {
    // Categorias
    async fn listar_categorias(&mut self) -> ResultadoArmazenamento<Vec<Categoria>>;
    async fn buscar_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>>;
    async fn bloquear_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>>;
    async fn buscar_categoria_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Categoria>>;
    async fn inserir_categoria(&mut self, nome: &str) -> ResultadoArmazenamento<Categoria>;
    async fn renomear_categoria(&mut self, id: i32, nome: &str) -> ResultadoArmazenamento<u64>;
    async fn remover_categoria(&mut self, id: i32) -> ResultadoArmazenamento<u64>;
    async fn contar_produtos_da_categoria(&mut self, id: i32) -> ResultadoArmazenamento<i64>;

    // Produtos
    async fn listar_produtos(&mut self, filtro: FiltroProdutos) -> ResultadoArmazenamento<Vec<Produto>>;
    async fn buscar_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>>;
    async fn bloquear_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>>;
    async fn buscar_produto_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Produto>>;
    async fn inserir_produto(&mut self, novo: &NovoProduto) -> ResultadoArmazenamento<Produto>;
    async fn alterar_produto(&mut self, id: i32, alteracoes: &AlteracoesProduto) -> ResultadoArmazenamento<u64>;
    async fn definir_estoque(&mut self, id: i32, estoque_atual: i32) -> ResultadoArmazenamento<u64>;
    async fn definir_ativo(&mut self, id: i32, ativo: bool) -> ResultadoArmazenamento<u64>;
    async fn remover_produto(&mut self, id: i32) -> ResultadoArmazenamento<u64>;
    async fn contar_movimentacoes_do_produto(&mut self, id: i32) -> ResultadoArmazenamento<i64>;

    // Movimentações
    async fn listar_movimentacoes(&mut self, id_produto: Option<i32>) -> ResultadoArmazenamento<Vec<Movimentacao>>;
    async fn listar_movimentacoes_completas(&mut self) -> ResultadoArmazenamento<Vec<MovimentacaoCompleta>>;
    async fn buscar_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<Option<Movimentacao>>;
    async fn inserir_movimentacao(&mut self, dados: &DadosMovimentacao) -> ResultadoArmazenamento<Movimentacao>;
    async fn remover_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<u64>;
    async fn remover_movimentacoes_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64>;

    // Histórico
    async fn listar_historico(&mut self) -> ResultadoArmazenamento<Vec<RegistroHistorico>>;
    async fn listar_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<Vec<HistoricoDetalhado>>;
    async fn buscar_historico(&mut self, id: i32) -> ResultadoArmazenamento<Option<RegistroHistorico>>;
    async fn inserir_historico(
        &mut self,
        id_movimentacao: i32,
        estoque_anterior: i32,
        estoque_posterior: i32,
    ) -> ResultadoArmazenamento<RegistroHistorico>;
    async fn remover_historico(&mut self, id: i32) -> ResultadoArmazenamento<u64>;
    async fn remover_historico_da_movimentacao(&mut self, id_movimentacao: i32) -> ResultadoArmazenamento<u64>;
    async fn remover_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64>;

    async fn confirmar(self: Box<Self>) -> ResultadoArmazenamento<()>;
    async fn desfazer(self: Box<Self>) -> ResultadoArmazenamento<()>;
}
