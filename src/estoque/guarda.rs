// src/estoque/guarda.rs

//! Verificações referenciais executadas antes de uma escrita, sempre dentro
//! da mesma transação da escrita que protegem.

use crate::armazenamento::{ResultadoArmazenamento, Transacao};
use crate::produtos::produtos_structs::Produto;

/// Resposta de uma verificação de exclusão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decisao {
    pub permitido: bool,
    /// Quantidade de registros dependentes que impedem a operação.
    pub bloqueios: i64,
}

impl Decisao {
    fn por_dependentes(bloqueios: i64) -> Self {
        Decisao { permitido: bloqueios == 0, bloqueios }
    }
}

/// Uma categoria só pode ser excluída se nenhum produto a referencia.
pub async fn pode_excluir_categoria(transacao: &mut dyn Transacao, id_categoria: i32) -> ResultadoArmazenamento<Decisao> {
    let produtos = transacao.contar_produtos_da_categoria(id_categoria).await?;
    Ok(Decisao::por_dependentes(produtos))
}

/// Um produto só pode ser removido do banco se não tiver movimentações.
pub async fn pode_excluir_produto_permanente(
    transacao: &mut dyn Transacao,
    id_produto: i32,
) -> ResultadoArmazenamento<Decisao> {
    let movimentacoes = transacao.contar_movimentacoes_do_produto(id_produto).await?;
    Ok(Decisao::por_dependentes(movimentacoes))
}

/// Lê e bloqueia o produto se ele existir e estiver ativo.
pub async fn produto_ativo_bloqueado(
    transacao: &mut dyn Transacao,
    id_produto: i32,
) -> ResultadoArmazenamento<Option<Produto>> {
    let produto = transacao.bloquear_produto(id_produto).await?;
    Ok(produto.filter(|p| p.ativo))
}

/// Bloqueia a categoria para que uma exclusão concorrente espere o vínculo.
pub async fn categoria_existe(transacao: &mut dyn Transacao, id_categoria: i32) -> ResultadoArmazenamento<bool> {
    Ok(transacao.bloquear_categoria(id_categoria).await?.is_some())
}

/// Verdadeiro se outra categoria (diferente de `ignorar`) já usa o nome.
pub async fn nome_de_categoria_em_uso(
    transacao: &mut dyn Transacao,
    nome: &str,
    ignorar: Option<i32>,
) -> ResultadoArmazenamento<bool> {
    let existente = transacao.buscar_categoria_por_nome(nome).await?;
    Ok(existente.map_or(false, |c| Some(c.id) != ignorar))
}

/// Verdadeiro se outro produto (diferente de `ignorar`) já usa o nome.
pub async fn nome_de_produto_em_uso(
    transacao: &mut dyn Transacao,
    nome: &str,
    ignorar: Option<i32>,
) -> ResultadoArmazenamento<bool> {
    let existente = transacao.buscar_produto_por_nome(nome).await?;
    Ok(existente.map_or(false, |p| Some(p.id) != ignorar))
}
