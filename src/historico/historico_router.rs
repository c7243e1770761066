// src/historico/historico_router.rs

use actix_web::{delete, get, web, HttpResponse};
use serde_json::json;

use crate::estoque::{consultas, exclusao};
use crate::shared::erros::ErroEstoque;
use crate::shared::shared_structs::GenericResponse;

use crate::AppState;

#[get("/historico-estoque")]
pub async fn buscar_historico(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let historico = consultas::listar_historico(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Histórico listado com sucesso!", historico)))
}

/// Histórico do produto com os dados de cada movimentação, do mais recente ao mais antigo.
#[get("/historico-estoque/produto/{id}")]
pub async fn buscar_historico_do_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let historico = consultas::historico_do_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Histórico do produto listado com sucesso!", historico)))
}

#[get("/historico-estoque/{id}")]
pub async fn buscar_historico_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let registro = consultas::buscar_historico(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Registro de histórico encontrado!", registro)))
}

/// Remove um registro de histórico. A movimentação continua existindo.
#[delete("/historico-estoque/{id}")]
pub async fn deletar_historico(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let registro = exclusao::excluir_registro_historico(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Registro de histórico excluído com sucesso!",
        registro,
    )))
}

#[delete("/historico-estoque/movimentacao/{id}")]
pub async fn deletar_historico_da_movimentacao(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let id_movimentacao = path.into_inner();
    let removidos = exclusao::excluir_historico_da_movimentacao(data.armazenamento.as_ref(), id_movimentacao).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Histórico da movimentação {} excluído com sucesso!", id_movimentacao),
        json!({ "id_movimentacao": id_movimentacao, "removidos": removidos }),
    )))
}

#[delete("/historico-estoque/produto/{id}")]
pub async fn deletar_historico_do_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let lote = exclusao::excluir_historico_do_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} registro(s) de histórico do produto \"{}\" excluído(s)!", lote.removidos, lote.produto),
        lote,
    )))
}
