// src/main.rs

use std::sync::Arc;

use actix_web::{get, web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;

// Importa os módulos
//
// Cada domínio tem sua pasta com `mod.rs`, structs e rotas.
mod armazenamento;  // Acesso transacional ao banco
mod categorias;     // Módulo de categorias
mod config;         // Variáveis de ambiente
mod estoque;        // Regras de consistência do estoque
mod historico;      // Histórico de saldos
mod movimentacoes;  // Entradas e saídas
mod produtos;       // Módulo de produtos
mod shared;         // Módulo shared


use armazenamento::armazenamento_postgres::PgArmazenamento;
use armazenamento::Armazenamento;
use shared::erros::ErroEstoque;
use shared::shared_structs::GenericResponse;

// Estado compartilhado entre as rotas: a fonte de transações do banco.
pub struct AppState {
    pub armazenamento: Arc<dyn Armazenamento>,
}

/// Verifica se a API está no ar e se o banco responde.
#[get("/")]
pub async fn verificar_saude(data: web::Data<AppState>) -> Result<HttpResponse, ErroEstoque> {
    estoque::consultas::verificar_conexao(data.armazenamento.as_ref()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "API de estoque funcionando!",
        serde_json::json!({ "banco": "conectado" }),
    )))
}

/// Registra todas as rotas. Rotas com segmentos fixos vêm antes das rotas
/// com `{id}` no mesmo prefixo.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(shared::resposta_erro::erro_de_json))
        .app_data(web::PathConfig::default().error_handler(shared::resposta_erro::erro_de_caminho))
        .app_data(web::QueryConfig::default().error_handler(shared::resposta_erro::erro_de_consulta))
        .service(verificar_saude)
        // Módulo de Categorias
        .service(categorias::categoria_router::cadastrar_categoria)
        .service(categorias::categoria_router::buscar_categorias)
        .service(categorias::categoria_router::buscar_categoria_por_id)
        .service(categorias::categoria_router::atualizar_categoria)
        .service(categorias::categoria_router::deletar_categoria)
        // Módulo de Produtos
        .service(produtos::produtos_router::buscar_produtos)
        .service(produtos::produtos_router::buscar_produtos_estoque_baixo)
        .service(produtos::produtos_router::buscar_produtos_por_categoria)
        .service(produtos::produtos_router::buscar_produtos_com_categoria)
        .service(produtos::produtos_router::buscar_produto_por_id)
        .service(produtos::produtos_router::cadastrar_produto)
        .service(produtos::produtos_router::atualizar_produto)
        .service(produtos::produtos_router::ajustar_estoque)
        .service(produtos::produtos_router::deletar_produto_permanente)
        .service(produtos::produtos_router::deletar_produto)
        // Módulo de Movimentações
        .service(movimentacoes::movimentacoes_router::buscar_movimentacoes)
        .service(movimentacoes::movimentacoes_router::buscar_movimentacoes_completas)
        .service(movimentacoes::movimentacoes_router::buscar_movimentacoes_do_produto)
        .service(movimentacoes::movimentacoes_router::buscar_movimentacao_por_id)
        .service(movimentacoes::movimentacoes_router::cadastrar_movimentacao)
        .service(movimentacoes::movimentacoes_router::deletar_movimentacoes_do_produto)
        .service(movimentacoes::movimentacoes_router::deletar_movimentacao)
        // Módulo de Histórico
        .service(historico::historico_router::buscar_historico)
        .service(historico::historico_router::buscar_historico_do_produto)
        .service(historico::historico_router::buscar_historico_por_id)
        .service(historico::historico_router::deletar_historico_da_movimentacao)
        .service(historico::historico_router::deletar_historico_do_produto)
        .service(historico::historico_router::deletar_historico);
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Variáveis do arquivo .env, se existir
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let configuracao = match config::Configuracao::do_ambiente() {
        Ok(configuracao) => configuracao,
        Err(e) => {
            log::error!("Configuração inválida: {}", e);
            std::process::exit(1);
        }
    };

    let opcoes = match configuracao.opcoes_de_conexao() {
        Ok(opcoes) => opcoes,
        Err(e) => {
            log::error!("Configuração inválida: {}", e);
            std::process::exit(1);
        }
    };

    // Pool de conexões PostgreSQL
    let db_pool = match PgPoolOptions::new()
        .max_connections(configuracao.max_conexoes)
        .connect_with(opcoes)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Falha ao conectar ao banco PostgreSQL: {}", e);
            std::process::exit(1);
        }
    };

    let armazenamento: Arc<dyn Armazenamento> = Arc::new(PgArmazenamento::new(db_pool));
    let app_state = web::Data::new(AppState { armazenamento });

    log::info!("Iniciando API de estoque em {}...", configuracao.endereco);

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(configurar))
        .bind(&configuracao.endereco)?
        .run()
        .await
}
