// src/config.rs

//! Configuração lida das variáveis de ambiente (e do `.env`, carregado no main).

use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const PORTA_PADRAO: u16 = 5432;
const ENDERECO_PADRAO: &str = "127.0.0.1:8080";
const CONEXOES_PADRAO: u32 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErroConfiguracao {
    #[error("variável de ambiente {0} não definida (ou defina DATABASE_URL)")]
    Ausente(&'static str),
    #[error("valor inválido em {variavel}: {valor}")]
    Invalida { variavel: &'static str, valor: String },
}

/// Como chegar ao banco: uma URL pronta ou as partes soltas `DB_*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conexao {
    Url(String),
    Partes {
        host: String,
        porta: u16,
        usuario: String,
        senha: String,
        banco: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuracao {
    pub conexao: Conexao,
    pub endereco: String,
    pub max_conexoes: u32,
}

impl Configuracao {
    pub fn do_ambiente() -> Result<Self, ErroConfiguracao> {
        Self::de(|nome| std::env::var(nome).ok())
    }

    /// Monta a configuração a partir de uma função de leitura de variáveis.
    pub fn de(ler: impl Fn(&str) -> Option<String>) -> Result<Self, ErroConfiguracao> {
        let conexao = match ler("DATABASE_URL") {
            Some(url) => Conexao::Url(url),
            None => {
                let obrigatoria = |nome: &'static str| ler(nome).ok_or(ErroConfiguracao::Ausente(nome));
                Conexao::Partes {
                    host: obrigatoria("DB_HOST")?,
                    usuario: obrigatoria("DB_USER")?,
                    senha: ler("DB_PASS").unwrap_or_default(),
                    banco: obrigatoria("DB_NAME")?,
                    porta: numero(&ler, "DB_PORT", PORTA_PADRAO)?,
                }
            }
        };

        Ok(Configuracao {
            conexao,
            endereco: ler("BIND_ADDR").unwrap_or_else(|| ENDERECO_PADRAO.to_string()),
            max_conexoes: numero(&ler, "DB_MAX_CONNECTIONS", CONEXOES_PADRAO)?,
        })
    }

    /// Opções de conexão do pool. As partes `DB_*` vão direto para o driver,
    /// sem passar por uma URL.
    pub fn opcoes_de_conexao(&self) -> Result<PgConnectOptions, ErroConfiguracao> {
        match &self.conexao {
            Conexao::Url(url) => PgConnectOptions::from_str(url).map_err(|_| ErroConfiguracao::Invalida {
                variavel: "DATABASE_URL",
                valor: url.clone(),
            }),
            Conexao::Partes { host, porta, usuario, senha, banco } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*porta)
                .username(usuario)
                .password(senha)
                .database(banco)),
        }
    }
}

fn numero<T: FromStr>(
    ler: &impl Fn(&str) -> Option<String>,
    variavel: &'static str,
    padrao: T,
) -> Result<T, ErroConfiguracao> {
    match ler(variavel) {
        None => Ok(padrao),
        Some(valor) => valor
            .trim()
            .parse()
            .map_err(|_| ErroConfiguracao::Invalida { variavel, valor }),
    }
}
