// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};

// Importa as structs de categoria
use super::categoria_structs::NovaCategoria;

use crate::estoque::{cadastro, consultas, exclusao};
use crate::shared::erros::ErroEstoque;
use crate::shared::shared_structs::GenericResponse;

// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para cadastrar uma nova categoria.
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ErroEstoque> {
    let nome = item.validar()?;
    let categoria = cadastro::criar_categoria(data.armazenamento.as_ref(), nome).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Categoria cadastrada com sucesso! ID: {}", categoria.id),
        categoria,
    )))
}

/// Rota para buscar todas as categorias.
#[get("/categorias")]
pub async fn buscar_categorias(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let categorias = consultas::listar_categorias(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Categorias listadas com sucesso!", categorias)))
}

/// Rota para buscar uma categoria específica por ID.
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let categoria = consultas::buscar_categoria(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Categoria encontrada com sucesso!", categoria)))
}

/// Rota para renomear uma categoria existente.
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ErroEstoque> {
    let id = path.into_inner();
    let nome = item.validar()?;
    let atualizada = cadastro::renomear_categoria(data.armazenamento.as_ref(), id, nome).await?;

    let mensagem = if atualizada.modificada {
        format!("Categoria {} atualizada com sucesso!", id)
    } else {
        format!("Categoria {} já possui este nome. Nenhuma alteração realizada.", id)
    };
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(mensagem, atualizada)))
}

/// Rota para excluir uma categoria. Bloqueada enquanto houver produtos vinculados.
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let categoria = exclusao::excluir_categoria(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria \"{}\" excluída com sucesso!", categoria.nome),
        categoria,
    )))
}
