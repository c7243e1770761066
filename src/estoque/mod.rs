// src/estoque/mod.rs

//! Núcleo de consistência do estoque.
//!
//! Estes módulos são os únicos que gravam produtos, movimentações e
//! histórico. Cada operação abre uma transação, verifica as pré-condições
//! dentro dela e termina em commit ou rollback completo.

use crate::armazenamento::Transacao;
use crate::shared::erros::ErroEstoque;

// Pré-condições referenciais (contagem de dependentes)
pub mod guarda;
// Registro de movimentações e do histórico de saldos
pub mod livro_movimentacoes;
// Políticas de exclusão: bloqueio, soft delete e cascata
pub mod exclusao;
// Cadastro de categorias e produtos
pub mod cadastro;
// Consultas somente leitura
pub mod consultas;

/// Confirma a transação se a operação deu certo; caso contrário desfaz tudo
/// e devolve o erro original.
pub(crate) async fn finalizar<T>(
    transacao: Box<dyn Transacao>,
    resultado: Result<T, ErroEstoque>,
) -> Result<T, ErroEstoque> {
    match resultado {
        Ok(valor) => {
            transacao.confirmar().await?;
            Ok(valor)
        }
        Err(erro) => {
            if let Err(falha) = transacao.desfazer().await {
                log::error!("Erro ao desfazer transação: {}", falha);
            }
            Err(erro)
        }
    }
}
