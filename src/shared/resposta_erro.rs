// src/shared/resposta_erro.rs

use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;

use super::erros::{Conflito, ErroEstoque, Motivo, Recurso};
use crate::armazenamento::ErroArmazenamento;
use super::shared_structs::GenericResponse;

/// Converte os erros do núcleo em respostas HTTP no formato `GenericResponse`.
impl ResponseError for ErroEstoque {
    fn status_code(&self) -> StatusCode {
        match self {
            ErroEstoque::EntradaInvalida { .. } => StatusCode::BAD_REQUEST,
            ErroEstoque::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ErroEstoque::Conflito(_) => StatusCode::CONFLICT,
            ErroEstoque::EstoqueInsuficiente { .. } => StatusCode::BAD_REQUEST,
            ErroEstoque::FalhaArmazenamento(ErroArmazenamento::Duplicado(_)) => StatusCode::CONFLICT,
            ErroEstoque::FalhaArmazenamento(e) if e.temporario() => StatusCode::SERVICE_UNAVAILABLE,
            ErroEstoque::FalhaArmazenamento(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut resposta = HttpResponse::build(self.status_code());

        match self {
            ErroEstoque::EstoqueInsuficiente { estoque_atual, solicitado } => {
                resposta.json(GenericResponse::erro_com_contexto(
                    format!("Estoque insuficiente. Estoque atual: {}. Quantidade solicitada: {}", estoque_atual, solicitado),
                    json!({ "estoque_atual": estoque_atual, "quantidade_solicitada": solicitado }),
                ))
            }
            ErroEstoque::Conflito(Conflito::CategoriaEmUso { produtos }) => {
                resposta.json(GenericResponse::erro_com_contexto(
                    format!(
                        "Não é possível excluir a categoria: existem {} produto(s) vinculado(s). Remova ou reclassifique os produtos antes de excluir a categoria.",
                        produtos
                    ),
                    json!({ "produtos_vinculados": produtos }),
                ))
            }
            ErroEstoque::Conflito(Conflito::ProdutoComMovimentacoes { movimentacoes }) => {
                resposta.json(GenericResponse::erro_com_contexto(
                    format!(
                        "Não é possível excluir permanentemente o produto: existem {} movimentação(ões) vinculada(s). Use a desativação (soft delete) em vez da exclusão permanente.",
                        movimentacoes
                    ),
                    json!({ "movimentacoes_vinculadas": movimentacoes }),
                ))
            }
            ErroEstoque::FalhaArmazenamento(ErroArmazenamento::Duplicado(restricao)) => {
                log::warn!("Valor duplicado barrado pela restrição {}", restricao);
                resposta.json(GenericResponse::erro("Já existe um registro com este valor."))
            }
            ErroEstoque::FalhaArmazenamento(e) if e.temporario() => {
                log::error!("Falha temporária de armazenamento: {}", e);
                resposta
                    .insert_header(("Retry-After", "1"))
                    .json(GenericResponse::erro("Banco de dados indisponível no momento. Tente novamente."))
            }
            ErroEstoque::FalhaArmazenamento(e) => {
                log::error!("Falha de armazenamento: {}", e);
                resposta.json(GenericResponse::erro("Erro interno ao acessar o banco de dados."))
            }
            outro => resposta.json(GenericResponse::erro(mensagem(outro))),
        }
    }
}

fn mensagem(erro: &ErroEstoque) -> String {
    match erro {
        ErroEstoque::EntradaInvalida { campo, motivo } => mensagem_de_campo(campo, motivo),
        ErroEstoque::NaoEncontrado(recurso) => match recurso {
            Recurso::Categoria(id) => format!("Categoria com ID {} não encontrada.", id),
            Recurso::Produto(id) => format!("Produto com ID {} não encontrado.", id),
            Recurso::ProdutoAtivo(id) => format!("Produto com ID {} não existe ou está inativo.", id),
            Recurso::Movimentacao(id) => format!("Movimentação com ID {} não encontrada.", id),
            Recurso::Historico(id) => format!("Registro de histórico com ID {} não encontrado.", id),
            Recurso::MovimentacoesDoProduto(id) => {
                format!("Nenhuma movimentação encontrada para o produto {}.", id)
            }
            Recurso::HistoricoDoProduto(id) => format!("Nenhum histórico encontrado para o produto {}.", id),
            Recurso::HistoricoDaMovimentacao(id) => {
                format!("Nenhum histórico encontrado para a movimentação {}.", id)
            }
        },
        ErroEstoque::Conflito(conflito) => match conflito {
            Conflito::ProdutoJaInativo => "Produto já está inativo.".to_string(),
            Conflito::NomeDeCategoriaDuplicado(nome) => format!("Já existe uma categoria com o nome \"{}\".", nome),
            Conflito::NomeDeProdutoDuplicado(nome) => format!("Já existe um produto com o nome \"{}\".", nome),
            // Conflitos com contagem são tratados em error_response
            outro => format!("Operação bloqueada: {:?}", outro),
        },
        outro => outro.to_string(),
    }
}

fn mensagem_de_campo(campo: &str, motivo: &Motivo) -> String {
    match motivo {
        Motivo::Obrigatorio => format!("O campo '{}' é obrigatório.", campo),
        Motivo::Vazio => format!("O campo '{}' não pode ser vazio.", campo),
        Motivo::MuitoLongo { maximo } => format!("O campo '{}' deve ter no máximo {} caracteres.", campo, maximo),
        Motivo::Negativo => format!("O campo '{}' não pode ser negativo.", campo),
        Motivo::NaoPositivo => format!("O campo '{}' deve ser um número inteiro positivo.", campo),
        Motivo::ForaDoIntervalo => match campo {
            "peso" => "O peso deve estar entre 0 e 999999.99.".to_string(),
            _ => format!("O campo '{}' está fora do intervalo permitido.", campo),
        },
        Motivo::TipoDesconhecido(tipo) => {
            format!("Tipo de movimentação inválido: \"{}\". O tipo deve ser \"entrada\" ou \"saida\".", tipo)
        }
        Motivo::NaoAlteravel => format!(
            "O campo '{}' não pode ser alterado por esta rota. O estoque muda apenas por movimentações.",
            campo
        ),
        Motivo::SemAlteracoes => "Nenhum campo para atualizar. Forneça pelo menos um campo.".to_string(),
    }
}

/// Erros de desserialização do corpo JSON também seguem o formato `GenericResponse`.
pub fn erro_de_json(erro: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mensagem = format!("Corpo da requisição inválido: {}", erro);
    error::InternalError::from_response(erro, HttpResponse::BadRequest().json(GenericResponse::erro(mensagem)))
        .into()
}

/// Id inválido no caminho (ex.: `/produtos/abc`).
pub fn erro_de_caminho(erro: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    let mensagem = format!("Parâmetro de rota inválido: {}", erro);
    error::InternalError::from_response(erro, HttpResponse::BadRequest().json(GenericResponse::erro(mensagem)))
        .into()
}

pub fn erro_de_consulta(erro: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let mensagem = format!("Parâmetro de consulta inválido: {}", erro);
    error::InternalError::from_response(erro, HttpResponse::BadRequest().json(GenericResponse::erro(mensagem)))
        .into()
}
