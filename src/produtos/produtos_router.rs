// src/produtos/produtos_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::json;

// Importa as structs definidas no módulo `produtos_structs` dentro da mesma pasta `produtos`
use super::produtos_structs::{AjusteEstoqueRequest, AtualizacaoProdutoRequest, ConsultaProdutos, NovoProdutoRequest};

use crate::estoque::{cadastro, consultas, exclusao, livro_movimentacoes};
use crate::shared::erros::{ErroEstoque, Motivo};
use crate::shared::shared_structs::GenericResponse;

// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para buscar todos os produtos.
///
/// Aceita `?categoria={id}` para filtrar pela categoria.
#[get("/produtos")]
pub async fn buscar_produtos(
    data: web::Data<AppState>,
    consulta: web::Query<ConsultaProdutos>,
) -> Result<HttpResponse, ErroEstoque> {
    let produtos = consultas::listar_produtos(data.armazenamento.as_ref(), consulta.categoria).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos listados com sucesso!", produtos)))
}

/// Produtos ativos com estoque abaixo ou no limite do estoque mínimo.
#[get("/produtos/estoque-baixo")]
pub async fn buscar_produtos_estoque_baixo(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let produtos = consultas::produtos_com_estoque_baixo(data.armazenamento.as_ref()).await?;
    let mensagem = format!("{} produto(s) com estoque baixo.", produtos.len());
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(mensagem, produtos)))
}

#[get("/produtos/categoria/{id}")]
pub async fn buscar_produtos_por_categoria(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let produtos = consultas::produtos_da_categoria(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos da categoria listados com sucesso!", produtos)))
}

/// Produtos ativos com o nome da categoria.
#[get("/produtos-com-categoria")]
pub async fn buscar_produtos_com_categoria(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    let produtos = consultas::produtos_com_categoria(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos listados com sucesso!", produtos)))
}

/// Rota para buscar um produto específico por ID.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let produto = consultas::buscar_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produto encontrado com sucesso!", produto)))
}

/// Rota para cadastrar um novo produto.
///
/// O estoque inicial (padrão 0) é o único valor de estoque gravado fora do
/// livro de movimentações.
#[post("/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    item: web::Json<NovoProdutoRequest>,
) -> Result<HttpResponse, ErroEstoque> {
    let novo = item.into_inner().validar()?;
    let produto = cadastro::criar_produto(data.armazenamento.as_ref(), novo).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Produto cadastrado com sucesso! ID: {}", produto.id),
        produto,
    )))
}

/// Rota para atualizar os dados cadastrais de um produto.
///
/// Apenas os campos enviados são alterados. `estoque_atual` e `ativo` são
/// recusados: o estoque muda por movimentações.
#[put("/produtos/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    item: web::Json<AtualizacaoProdutoRequest>,
) -> Result<HttpResponse, ErroEstoque> {
    let id = path.into_inner();
    let alteracoes = item.into_inner().validar()?;
    let campos = alteracoes.quantidade_de_campos();
    let produto = cadastro::atualizar_produto(data.armazenamento.as_ref(), id, alteracoes).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto {} atualizado com sucesso! {} campo(s) alterado(s).", id, campos),
        produto,
    )))
}

/// Ajusta o estoque para um valor absoluto. A diferença é lançada como
/// movimentação de entrada ou saída.
#[patch("/produtos/{id}/estoque")]
pub async fn ajustar_estoque(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    item: web::Json<AjusteEstoqueRequest>,
) -> Result<HttpResponse, ErroEstoque> {
    let id = path.into_inner();
    let novo_estoque = item
        .estoque_atual
        .ok_or_else(|| ErroEstoque::entrada_invalida("estoque_atual", Motivo::Obrigatorio))?;
    let ajuste = livro_movimentacoes::ajustar_estoque(data.armazenamento.as_ref(), id, novo_estoque).await?;

    let mensagem = match &ajuste.lancamento {
        Some(lancamento) => format!(
            "Estoque do produto {} ajustado de {} para {} ({}).",
            id,
            ajuste.estoque_anterior,
            ajuste.estoque_atual,
            lancamento.diferenca()
        ),
        None => format!("Estoque do produto {} já era {}. Nenhuma movimentação registrada.", id, ajuste.estoque_atual),
    };
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(mensagem, ajuste)))
}

/// Desativa o produto (soft delete). O histórico de movimentações é mantido.
#[delete("/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let produto = exclusao::desativar_produto(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto \"{}\" desativado com sucesso!", produto.nome),
        produto,
    )))
}

/// Remove o produto do banco. Recusado se houver movimentações.
#[delete("/produtos/{id}/permanente")]
pub async fn deletar_produto_permanente(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroEstoque> {
    let produto = exclusao::excluir_produto_permanente(data.armazenamento.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto \"{}\" excluído permanentemente!", produto.nome),
        json!({ "id": produto.id, "nome": produto.nome }),
    )))
}
