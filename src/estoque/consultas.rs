// src/estoque/consultas.rs

//! Consultas somente leitura.

use super::finalizar;
use crate::armazenamento::Armazenamento;
use crate::categorias::categoria_structs::Categoria;
use crate::historico::historico_structs::{HistoricoDetalhado, RegistroHistorico};
use crate::movimentacoes::movimentacoes_structs::{Movimentacao, MovimentacaoCompleta};
use crate::produtos::produtos_structs::{FiltroProdutos, OrdemProdutos, Produto};
use crate::shared::erros::{ErroEstoque, Recurso};

pub async fn listar_categorias(armazenamento: &dyn Armazenamento) -> Result<Vec<Categoria>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = transacao.listar_categorias().await.map_err(ErroEstoque::from);
    finalizar(transacao, resultado).await
}

pub async fn buscar_categoria(armazenamento: &dyn Armazenamento, id: i32) -> Result<Categoria, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = match transacao.buscar_categoria(id).await {
        Ok(categoria) => categoria.ok_or(ErroEstoque::NaoEncontrado(Recurso::Categoria(id))),
        Err(e) => Err(e.into()),
    };
    finalizar(transacao, resultado).await
}

/// Todos os produtos (ativos e inativos), opcionalmente de uma categoria.
pub async fn listar_produtos(
    armazenamento: &dyn Armazenamento,
    id_categoria: Option<i32>,
) -> Result<Vec<Produto>, ErroEstoque> {
    filtrar_produtos(armazenamento, FiltroProdutos { id_categoria, ..Default::default() }).await
}

/// Produtos de uma categoria existente.
pub async fn produtos_da_categoria(armazenamento: &dyn Armazenamento, id_categoria: i32) -> Result<Vec<Produto>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        transacao
            .buscar_categoria(id_categoria)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Categoria(id_categoria)))?;
        let filtro = FiltroProdutos { id_categoria: Some(id_categoria), ..Default::default() };
        Ok::<_, ErroEstoque>(transacao.listar_produtos(filtro).await?)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Produtos ativos com o nome da categoria, em ordem alfabética.
pub async fn produtos_com_categoria(armazenamento: &dyn Armazenamento) -> Result<Vec<Produto>, ErroEstoque> {
    let filtro = FiltroProdutos { somente_ativos: true, ordem: OrdemProdutos::Nome, ..Default::default() };
    filtrar_produtos(armazenamento, filtro).await
}

/// Produtos ativos com estoque atual menor ou igual ao mínimo, do menor estoque para o maior.
pub async fn produtos_com_estoque_baixo(armazenamento: &dyn Armazenamento) -> Result<Vec<Produto>, ErroEstoque> {
    let filtro = FiltroProdutos {
        somente_ativos: true,
        estoque_baixo: true,
        ordem: OrdemProdutos::EstoqueCrescente,
        ..Default::default()
    };
    filtrar_produtos(armazenamento, filtro).await
}

async fn filtrar_produtos(armazenamento: &dyn Armazenamento, filtro: FiltroProdutos) -> Result<Vec<Produto>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = transacao.listar_produtos(filtro).await.map_err(ErroEstoque::from);
    finalizar(transacao, resultado).await
}

pub async fn buscar_produto(armazenamento: &dyn Armazenamento, id: i32) -> Result<Produto, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = match transacao.buscar_produto(id).await {
        Ok(produto) => produto.ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id))),
        Err(e) => Err(e.into()),
    };
    finalizar(transacao, resultado).await
}

/// Movimentações mais recentes primeiro.
pub async fn listar_movimentacoes(armazenamento: &dyn Armazenamento) -> Result<Vec<Movimentacao>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = transacao.listar_movimentacoes(None).await.map_err(ErroEstoque::from);
    finalizar(transacao, resultado).await
}

/// Movimentações com nome e descrição do produto e nome da categoria, das mais recentes para as mais antigas.
pub async fn listar_movimentacoes_completas(
    armazenamento: &dyn Armazenamento,
) -> Result<Vec<MovimentacaoCompleta>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = transacao.listar_movimentacoes_completas().await.map_err(ErroEstoque::from);
    finalizar(transacao, resultado).await
}

pub async fn buscar_movimentacao(armazenamento: &dyn Armazenamento, id: i32) -> Result<Movimentacao, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = match transacao.buscar_movimentacao(id).await {
        Ok(movimentacao) => movimentacao.ok_or(ErroEstoque::NaoEncontrado(Recurso::Movimentacao(id))),
        Err(e) => Err(e.into()),
    };
    finalizar(transacao, resultado).await
}

pub async fn movimentacoes_do_produto(
    armazenamento: &dyn Armazenamento,
    id_produto: i32,
) -> Result<Vec<Movimentacao>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        transacao
            .buscar_produto(id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id_produto)))?;
        Ok::<_, ErroEstoque>(transacao.listar_movimentacoes(Some(id_produto)).await?)
    }
    .await;
    finalizar(transacao, resultado).await
}

pub async fn listar_historico(armazenamento: &dyn Armazenamento) -> Result<Vec<RegistroHistorico>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = transacao.listar_historico().await.map_err(ErroEstoque::from);
    finalizar(transacao, resultado).await
}

pub async fn buscar_historico(armazenamento: &dyn Armazenamento, id: i32) -> Result<RegistroHistorico, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = match transacao.buscar_historico(id).await {
        Ok(registro) => registro.ok_or(ErroEstoque::NaoEncontrado(Recurso::Historico(id))),
        Err(e) => Err(e.into()),
    };
    finalizar(transacao, resultado).await
}

/// Histórico do produto com tipo, quantidade e data de cada movimentação.
pub async fn historico_do_produto(
    armazenamento: &dyn Armazenamento,
    id_produto: i32,
) -> Result<Vec<HistoricoDetalhado>, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        transacao
            .buscar_produto(id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id_produto)))?;
        Ok::<_, ErroEstoque>(transacao.listar_historico_do_produto(id_produto).await?)
    }
    .await;
    finalizar(transacao, resultado).await
}

pub async fn verificar_conexao(armazenamento: &dyn Armazenamento) -> Result<(), ErroEstoque> {
    Ok(armazenamento.verificar_conexao().await?)
}
