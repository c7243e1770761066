// src/movimentacoes/movimentacoes_router.rs

use actix_web::{delete, get, post, routes, web, HttpResponse};

use super::movimentacoes_structs::NovaMovimentacaoRequest;

use crate::estoque::{consultas, exclusao, livro_movimentacoes};
use crate::shared::erros::ErroEstoque;
use crate::shared::shared_structs::GenericResponse;

use crate::AppState;

/// Lista as movimentações, das mais recentes para as mais antigas.
#[get("/movimentacoes")]
pub async fn buscar_movimentacoes(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let movimentacoes = consultas::listar_movimentacoes(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Movimentações listadas com sucesso!", movimentacoes)))
}

/// Movimentações com nome e descrição do produto e nome da categoria.
#[routes]
#[get("/movimentacoes/completas")]
#[get("/movimentacoes-completas")]
pub async fn buscar_movimentacoes_completas(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let movimentacoes = consultas::listar_movimentacoes_completas(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Movimentações completas listadas com sucesso!",
        movimentacoes,
    )))
}

#[get("/movimentacoes/produto/{id}")]
pub async fn buscar_movimentacoes_do_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let movimentacoes = consultas::movimentacoes_do_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Movimentações do produto listadas com sucesso!",
        movimentacoes,
    )))
}

#[get("/movimentacoes/{id}")]
pub async fn buscar_movimentacao_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let movimentacao = consultas::buscar_movimentacao(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Movimentação encontrada com sucesso!", movimentacao)))
}

/// Registra uma entrada ou saída. Movimentação, novo saldo e histórico são
/// gravados na mesma transação.
#[post("/movimentacoes")]
pub async fn cadastrar_movimentacao(
    data: web::Data<AppState>,
    item: web::Json<NovaMovimentacaoRequest>,
) -> Result<HttpResponse, ErroEstoque> {
    let nova = item.into_inner().validar()?;
    let registrada = livro_movimentacoes::registrar_movimentacao(data.armazenamento.as_ref(), nova).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!(
            "Movimentação registrada com sucesso! Estoque: {} -> {} ({})",
            registrada.historico.estoque_anterior,
            registrada.historico.estoque_posterior,
            registrada.diferenca()
        ),
        registrada,
    )))
}

/// Exclui a movimentação e o histórico gerado por ela.
/// O estoque atual do produto não é revertido.
#[delete("/movimentacoes/{id}")]
pub async fn deletar_movimentacao(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let excluida = exclusao::excluir_movimentacao(data.armazenamento.as_ref(), path.into_inner()).await?;

    let mensagem = if excluida.historico_removido {
        "Movimentação excluída com sucesso! Histórico de estoque também foi removido."
    } else {
        "Movimentação excluída com sucesso! Sem histórico associado."
    };
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(mensagem, excluida)))
}

/// Exclui todas as movimentações de um produto (e o histórico delas). Irreversível.
#[delete("/movimentacoes/produto/{id}")]
pub async fn deletar_movimentacoes_do_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let lote = exclusao::excluir_movimentacoes_do_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!(
            "{} movimentação(ões) do produto \"{}\" excluída(s) com sucesso!",
            lote.removidos, lote.produto
        ),
        lote,
    )))
}
