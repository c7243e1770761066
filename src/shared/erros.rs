// src/shared/erros.rs

use thiserror::Error;

use crate::armazenamento::ErroArmazenamento;

/// Registro referenciado por uma operação que não foi encontrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurso {
    Categoria(i32),
    Produto(i32),
    /// Produto inexistente ou inativo (não aceita movimentações).
    ProdutoAtivo(i32),
    Movimentacao(i32),
    Historico(i32),
    MovimentacoesDoProduto(i32),
    HistoricoDoProduto(i32),
    HistoricoDaMovimentacao(i32),
}

/// Regra referencial ou de estado que bloqueou a operação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflito {
    CategoriaEmUso { produtos: i64 },
    ProdutoJaInativo,
    ProdutoComMovimentacoes { movimentacoes: i64 },
    NomeDeCategoriaDuplicado(String),
    NomeDeProdutoDuplicado(String),
}

/// Por que um campo de entrada foi rejeitado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motivo {
    Obrigatorio,
    Vazio,
    MuitoLongo { maximo: usize },
    Negativo,
    NaoPositivo,
    ForaDoIntervalo,
    TipoDesconhecido(String),
    /// Campo que só muda por outro caminho (ex.: estoque só via movimentação).
    NaoAlteravel,
    SemAlteracoes,
}

/// Erros do núcleo de estoque.
///
/// Carregam apenas o tipo do erro e os dados de contexto; a camada HTTP
/// monta as mensagens para o usuário.
#[derive(Debug, Error)]
pub enum ErroEstoque {
    #[error("campo inválido `{campo}`: {motivo:?}")]
    EntradaInvalida { campo: &'static str, motivo: Motivo },

    #[error("registro não encontrado: {0:?}")]
    NaoEncontrado(Recurso),

    #[error("operação bloqueada: {0:?}")]
    Conflito(Conflito),

    #[error("estoque insuficiente (atual: {estoque_atual}, solicitado: {solicitado})")]
    EstoqueInsuficiente { estoque_atual: i32, solicitado: i32 },

    #[error("falha de armazenamento: {0}")]
    FalhaArmazenamento(#[from] ErroArmazenamento),
}

impl ErroEstoque {
    pub fn entrada_invalida(campo: &'static str, motivo: Motivo) -> Self {
        ErroEstoque::EntradaInvalida { campo, motivo }
    }

    /// Somente falhas temporárias de armazenamento (conexão, pool,
    /// serialização) podem ser repetidas pelo chamador.
    pub fn pode_repetir(&self) -> bool {
        matches!(self, ErroEstoque::FalhaArmazenamento(e) if e.temporario())
    }

    /// Traduz a violação de unicidade do banco para o conflito de nome da
    /// operação; os demais erros seguem como estão.
    pub fn duplicado_como(self, conflito: Conflito) -> Self {
        match self {
            ErroEstoque::FalhaArmazenamento(ErroArmazenamento::Duplicado(restricao)) => {
                log::warn!("Nome duplicado barrado pela restrição {}", restricao);
                ErroEstoque::Conflito(conflito)
            }
            outro => outro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apenas_falha_de_armazenamento_pode_ser_repetida() {
        let falha = ErroEstoque::from(ErroArmazenamento::Indisponivel("conexão perdida".into()));
        assert!(falha.pode_repetir());

        assert!(!ErroEstoque::NaoEncontrado(Recurso::Produto(1)).pode_repetir());
        assert!(!ErroEstoque::Conflito(Conflito::ProdutoJaInativo).pode_repetir());
        assert!(!ErroEstoque::EstoqueInsuficiente { estoque_atual: 1, solicitado: 2 }.pode_repetir());
        assert!(!ErroEstoque::entrada_invalida("nome", Motivo::Vazio).pode_repetir());
    }

    #[test]
    fn violacao_permanente_do_banco_nao_pode_ser_repetida() {
        let checagem = ErroEstoque::from(ErroArmazenamento::Banco(sqlx::Error::RowNotFound));
        assert!(!checagem.pode_repetir());
        assert!(!ErroEstoque::from(ErroArmazenamento::Duplicado("produtos_nome_key".into())).pode_repetir());
    }

    #[test]
    fn duplicado_vira_conflito_de_nome() {
        let erro = ErroEstoque::from(ErroArmazenamento::Duplicado("categorias_nome_key".into()))
            .duplicado_como(Conflito::NomeDeCategoriaDuplicado("Bolsas".into()));
        assert!(matches!(erro, ErroEstoque::Conflito(Conflito::NomeDeCategoriaDuplicado(ref n)) if n == "Bolsas"));

        let erro = ErroEstoque::from(ErroArmazenamento::Indisponivel("timeout".into()))
            .duplicado_como(Conflito::NomeDeProdutoDuplicado("Cinto".into()));
        assert!(erro.pode_repetir());
    }
}
