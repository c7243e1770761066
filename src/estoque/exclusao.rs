// src/estoque/exclusao.rs

//! Políticas de exclusão por tipo de registro:
//!
//! - categoria: bloqueada enquanto houver produtos vinculados;
//! - produto: desativação (soft delete) ou remoção permanente apenas sem movimentações;
//! - movimentação: remove primeiro o histórico e depois a movimentação;
//! - histórico: removido sozinho, sem tocar na movimentação.

use super::{finalizar, guarda};
use crate::armazenamento::Armazenamento;
use crate::categorias::categoria_structs::Categoria;
use crate::historico::historico_structs::RegistroHistorico;
use crate::movimentacoes::movimentacoes_structs::{ExclusaoEmLote, MovimentacaoExcluida};
use crate::produtos::produtos_structs::Produto;
use crate::shared::erros::{Conflito, ErroEstoque, Recurso};

pub async fn excluir_categoria(armazenamento: &dyn Armazenamento, id: i32) -> Result<Categoria, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let categoria = transacao
            .bloquear_categoria(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Categoria(id)))?;

        let decisao = guarda::pode_excluir_categoria(transacao.as_mut(), id).await?;
        if !decisao.permitido {
            log::warn!(
                "Exclusão da categoria {} recusada: {} produto(s) vinculado(s)",
                id,
                decisao.bloqueios
            );
            return Err(ErroEstoque::Conflito(Conflito::CategoriaEmUso { produtos: decisao.bloqueios }));
        }

        transacao.remover_categoria(id).await?;
        log::info!("Categoria {} ({}) excluída", id, categoria.nome);
        Ok(categoria)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Soft delete: marca o produto como inativo. Movimentações e histórico
/// permanecem; o produto deixa de aceitar movimentações.
pub async fn desativar_produto(armazenamento: &dyn Armazenamento, id: i32) -> Result<Produto, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let mut produto = transacao
            .bloquear_produto(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id)))?;
        if !produto.ativo {
            return Err(ErroEstoque::Conflito(Conflito::ProdutoJaInativo));
        }

        transacao.definir_ativo(id, false).await?;
        produto.ativo = false;
        log::info!("Produto {} ({}) desativado", id, produto.nome);
        Ok(produto)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Remove o produto do banco. Só é permitido quando não há movimentações;
/// caso contrário o caminho é a desativação.
pub async fn excluir_produto_permanente(armazenamento: &dyn Armazenamento, id: i32) -> Result<Produto, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let produto = transacao
            .bloquear_produto(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id)))?;

        let decisao = guarda::pode_excluir_produto_permanente(transacao.as_mut(), id).await?;
        if !decisao.permitido {
            log::warn!(
                "Exclusão permanente do produto {} recusada: {} movimentação(ões)",
                id,
                decisao.bloqueios
            );
            return Err(ErroEstoque::Conflito(Conflito::ProdutoComMovimentacoes {
                movimentacoes: decisao.bloqueios,
            }));
        }

        transacao.remover_produto(id).await?;
        log::info!("Produto {} ({}) excluído permanentemente", id, produto.nome);
        Ok(produto)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Remove a movimentação e o histórico que ela gerou.
///
/// O saldo do produto não é recalculado: o `estoque_atual` continua
/// refletindo a movimentação removida.
pub async fn excluir_movimentacao(armazenamento: &dyn Armazenamento, id: i32) -> Result<MovimentacaoExcluida, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let movimentacao = transacao
            .buscar_movimentacao(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Movimentacao(id)))?;

        let historico = transacao.remover_historico_da_movimentacao(id).await?;
        if transacao.remover_movimentacao(id).await? == 0 {
            return Err(ErroEstoque::NaoEncontrado(Recurso::Movimentacao(id)));
        }

        log::warn!(
            "Movimentação {} excluída ({} {} do produto {}); o estoque atual não foi revertido",
            id,
            movimentacao.tipo,
            movimentacao.quantidade,
            movimentacao.id_produto
        );
        Ok(MovimentacaoExcluida { movimentacao, historico_removido: historico > 0 })
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Remove todas as movimentações de um produto e o histórico correspondente.
pub async fn excluir_movimentacoes_do_produto(
    armazenamento: &dyn Armazenamento,
    id_produto: i32,
) -> Result<ExclusaoEmLote, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let produto = transacao
            .bloquear_produto(id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id_produto)))?;
        if transacao.contar_movimentacoes_do_produto(id_produto).await? == 0 {
            return Err(ErroEstoque::NaoEncontrado(Recurso::MovimentacoesDoProduto(id_produto)));
        }

        transacao.remover_historico_do_produto(id_produto).await?;
        let removidos = transacao.remover_movimentacoes_do_produto(id_produto).await?;
        log::warn!("{} movimentação(ões) do produto {} excluída(s)", removidos, id_produto);
        Ok(ExclusaoEmLote { id_produto, produto: produto.nome, removidos })
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Remove o histórico de todas as movimentações de um produto, mantendo as movimentações.
pub async fn excluir_historico_do_produto(
    armazenamento: &dyn Armazenamento,
    id_produto: i32,
) -> Result<ExclusaoEmLote, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let produto = transacao
            .buscar_produto(id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id_produto)))?;

        let removidos = transacao.remover_historico_do_produto(id_produto).await?;
        if removidos == 0 {
            return Err(ErroEstoque::NaoEncontrado(Recurso::HistoricoDoProduto(id_produto)));
        }
        log::warn!("{} registro(s) de histórico do produto {} excluído(s)", removidos, id_produto);
        Ok(ExclusaoEmLote { id_produto, produto: produto.nome, removidos })
    }
    .await;
    finalizar(transacao, resultado).await
}

pub async fn excluir_registro_historico(armazenamento: &dyn Armazenamento, id: i32) -> Result<RegistroHistorico, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let registro = transacao
            .buscar_historico(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Historico(id)))?;
        transacao.remover_historico(id).await?;
        log::info!("Registro de histórico {} excluído", id);
        Ok::<_, ErroEstoque>(registro)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Remove o histórico de uma movimentação; devolve quantos registros saíram.
pub async fn excluir_historico_da_movimentacao(
    armazenamento: &dyn Armazenamento,
    id_movimentacao: i32,
) -> Result<u64, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let removidos = transacao.remover_historico_da_movimentacao(id_movimentacao).await?;
        if removidos == 0 {
            return Err(ErroEstoque::NaoEncontrado(Recurso::HistoricoDaMovimentacao(id_movimentacao)));
        }
        log::info!("Histórico da movimentação {} excluído", id_movimentacao);
        Ok(removidos)
    }
    .await;
    finalizar(transacao, resultado).await
}
