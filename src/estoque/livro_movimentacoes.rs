// src/estoque/livro_movimentacoes.rs

//! Único caminho que altera o estoque de um produto.
//!
//! Uma movimentação grava, na mesma transação: a linha em `movimentacoes`,
//! o novo `estoque_atual` do produto e o registro em `historico_estoque`
//! com o saldo antes e depois. Movimentações gravadas não são editadas.

use chrono::Utc;

use super::{finalizar, guarda};
use crate::armazenamento::{Armazenamento, Transacao};
use crate::movimentacoes::movimentacoes_structs::{
    DadosMovimentacao, MovimentacaoRegistrada, NovaMovimentacao, TipoMovimentacao,
};
use crate::produtos::produtos_structs::{AjusteEstoque, Produto};
use crate::shared::erros::{ErroEstoque, Motivo, Recurso};

pub const OBSERVACAO_AJUSTE: &str = "Ajuste manual de estoque";

/// Registra uma entrada ou saída de estoque.
///
/// Falha com `NaoEncontrado` se o produto não existe ou está inativo,
/// `EntradaInvalida` se a quantidade não é um inteiro positivo e
/// `EstoqueInsuficiente` se a saída excede o saldo (sem atendimento parcial).
pub async fn registrar_movimentacao(
    armazenamento: &dyn Armazenamento,
    nova: NovaMovimentacao,
) -> Result<MovimentacaoRegistrada, ErroEstoque> {
    let quantidade = validar_quantidade(nova.quantidade)?;

    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let produto = guarda::produto_ativo_bloqueado(transacao.as_mut(), nova.id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::ProdutoAtivo(nova.id_produto)))?;
        lancar(transacao.as_mut(), &produto, nova.tipo, quantidade, nova.observacao).await
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Leva o estoque de um produto ativo a um valor absoluto, lançando a
/// diferença como movimentação de entrada ou saída. Sem diferença, nada é
/// gravado.
pub async fn ajustar_estoque(
    armazenamento: &dyn Armazenamento,
    id_produto: i32,
    novo_estoque: i64,
) -> Result<AjusteEstoque, ErroEstoque> {
    if novo_estoque < 0 {
        return Err(ErroEstoque::entrada_invalida("estoque_atual", Motivo::Negativo));
    }
    let novo_estoque = i32::try_from(novo_estoque)
        .map_err(|_| ErroEstoque::entrada_invalida("estoque_atual", Motivo::ForaDoIntervalo))?;

    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let produto = guarda::produto_ativo_bloqueado(transacao.as_mut(), id_produto)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::ProdutoAtivo(id_produto)))?;

        let diferenca = i64::from(novo_estoque) - i64::from(produto.estoque_atual);
        let tipo = match diferenca {
            0 => None,
            d if d > 0 => Some(TipoMovimentacao::Entrada),
            _ => Some(TipoMovimentacao::Saida),
        };
        let lancamento = match tipo {
            Some(tipo) => {
                let quantidade = validar_quantidade(diferenca.abs())?;
                let observacao = Some(OBSERVACAO_AJUSTE.to_string());
                Some(lancar(transacao.as_mut(), &produto, tipo, quantidade, observacao).await?)
            }
            None => {
                log::info!("Ajuste do produto {} sem alteração (estoque {})", produto.id, novo_estoque);
                None
            }
        };

        Ok::<_, ErroEstoque>(AjusteEstoque {
            id_produto: produto.id,
            nome: produto.nome,
            estoque_anterior: produto.estoque_atual,
            estoque_atual: novo_estoque,
            diferenca,
            tipo_operacao: tipo.map_or("sem alteração", |t| t.como_str()),
            lancamento,
        })
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Quantidade de uma movimentação: inteiro positivo que cabe na coluna INTEGER.
fn validar_quantidade(quantidade: i64) -> Result<i32, ErroEstoque> {
    if quantidade <= 0 {
        return Err(ErroEstoque::entrada_invalida("quantidade", Motivo::NaoPositivo));
    }
    i32::try_from(quantidade).map_err(|_| ErroEstoque::entrada_invalida("quantidade", Motivo::ForaDoIntervalo))
}

/// Saldo resultante de aplicar a movimentação ao saldo atual.
pub fn calcular_saldo(tipo: TipoMovimentacao, saldo: i32, quantidade: i32) -> Result<i32, ErroEstoque> {
    match tipo {
        TipoMovimentacao::Entrada => saldo
            .checked_add(quantidade)
            .ok_or(ErroEstoque::entrada_invalida("quantidade", Motivo::ForaDoIntervalo)),
        TipoMovimentacao::Saida if quantidade > saldo => Err(ErroEstoque::EstoqueInsuficiente {
            estoque_atual: saldo,
            solicitado: quantidade,
        }),
        TipoMovimentacao::Saida => Ok(saldo - quantidade),
    }
}

/// Grava movimentação, saldo e histórico. O produto já deve estar bloqueado
/// pela transação.
async fn lancar(
    transacao: &mut dyn Transacao,
    produto: &Produto,
    tipo: TipoMovimentacao,
    quantidade: i32,
    observacao: Option<String>,
) -> Result<MovimentacaoRegistrada, ErroEstoque> {
    let estoque_anterior = produto.estoque_atual;
    let estoque_posterior = match calcular_saldo(tipo, estoque_anterior, quantidade) {
        Ok(saldo) => saldo,
        Err(erro) => {
            log::warn!(
                "Movimentação recusada para o produto {} ({}): {}",
                produto.id,
                produto.nome,
                erro
            );
            return Err(erro);
        }
    };

    let dados = DadosMovimentacao {
        id_produto: produto.id,
        tipo,
        quantidade,
        data_movimentacao: Utc::now(),
        observacao,
    };
    let movimentacao = transacao.inserir_movimentacao(&dados).await?;
    transacao.definir_estoque(produto.id, estoque_posterior).await?;
    let historico = transacao
        .inserir_historico(movimentacao.id, estoque_anterior, estoque_posterior)
        .await?;

    log::info!(
        "Movimentação {} registrada: produto {} {} {} ({} -> {})",
        movimentacao.id,
        produto.id,
        tipo,
        quantidade,
        estoque_anterior,
        estoque_posterior
    );
    Ok(MovimentacaoRegistrada { movimentacao, historico })
}
