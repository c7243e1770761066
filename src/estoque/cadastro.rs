// src/estoque/cadastro.rs

//! Cadastro de categorias e produtos. Nomes únicos e categoria existente são
//! verificados na mesma transação da escrita.

use super::{finalizar, guarda};
use crate::armazenamento::{Armazenamento, Transacao};
use crate::categorias::categoria_structs::{Categoria, CategoriaAtualizada};
use crate::produtos::produtos_structs::{AlteracoesProduto, NovoProduto, Produto};
use crate::shared::erros::{Conflito, ErroEstoque, Recurso};

pub async fn criar_categoria(armazenamento: &dyn Armazenamento, nome: String) -> Result<Categoria, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        if guarda::nome_de_categoria_em_uso(transacao.as_mut(), &nome, None).await? {
            return Err(ErroEstoque::Conflito(Conflito::NomeDeCategoriaDuplicado(nome)));
        }
        let categoria = transacao
            .inserir_categoria(&nome)
            .await
            .map_err(|e| ErroEstoque::from(e).duplicado_como(Conflito::NomeDeCategoriaDuplicado(nome.clone())))?;
        log::info!("Categoria {} cadastrada: {}", categoria.id, categoria.nome);
        Ok(categoria)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Renomeia a categoria. Enviar o nome atual não grava nada e devolve
/// `modificada: false`.
pub async fn renomear_categoria(
    armazenamento: &dyn Armazenamento,
    id: i32,
    nome: String,
) -> Result<CategoriaAtualizada, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        let atual = transacao
            .bloquear_categoria(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Categoria(id)))?;
        if atual.nome == nome {
            return Ok(CategoriaAtualizada { nome_anterior: atual.nome.clone(), categoria: atual, modificada: false });
        }
        if guarda::nome_de_categoria_em_uso(transacao.as_mut(), &nome, Some(id)).await? {
            return Err(ErroEstoque::Conflito(Conflito::NomeDeCategoriaDuplicado(nome)));
        }

        transacao
            .renomear_categoria(id, &nome)
            .await
            .map_err(|e| ErroEstoque::from(e).duplicado_como(Conflito::NomeDeCategoriaDuplicado(nome.clone())))?;
        log::info!("Categoria {} renomeada: {} -> {}", id, atual.nome, nome);
        Ok(CategoriaAtualizada {
            categoria: Categoria { id, nome },
            modificada: true,
            nome_anterior: atual.nome,
        })
    }
    .await;
    finalizar(transacao, resultado).await
}

pub async fn criar_produto(armazenamento: &dyn Armazenamento, novo: NovoProduto) -> Result<Produto, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        if guarda::nome_de_produto_em_uso(transacao.as_mut(), &novo.nome, None).await? {
            return Err(ErroEstoque::Conflito(Conflito::NomeDeProdutoDuplicado(novo.nome.clone())));
        }
        if let Some(id_categoria) = novo.id_categoria {
            exigir_categoria(transacao.as_mut(), id_categoria).await?;
        }

        let produto = transacao
            .inserir_produto(&novo)
            .await
            .map_err(|e| ErroEstoque::from(e).duplicado_como(Conflito::NomeDeProdutoDuplicado(novo.nome.clone())))?;
        log::info!("Produto {} cadastrado: {} (estoque {})", produto.id, produto.nome, produto.estoque_atual);
        Ok(produto)
    }
    .await;
    finalizar(transacao, resultado).await
}

/// Aplica as alterações cadastrais e devolve o produto atualizado.
pub async fn atualizar_produto(
    armazenamento: &dyn Armazenamento,
    id: i32,
    alteracoes: AlteracoesProduto,
) -> Result<Produto, ErroEstoque> {
    let mut transacao = armazenamento.iniciar().await?;
    let resultado = async {
        transacao
            .bloquear_produto(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id)))?;

        if let Some(nome) = &alteracoes.nome {
            if guarda::nome_de_produto_em_uso(transacao.as_mut(), nome, Some(id)).await? {
                return Err(ErroEstoque::Conflito(Conflito::NomeDeProdutoDuplicado(nome.clone())));
            }
        }
        if let Some(Some(id_categoria)) = alteracoes.id_categoria {
            exigir_categoria(transacao.as_mut(), id_categoria).await?;
        }

        transacao.alterar_produto(id, &alteracoes).await.map_err(|e| {
            ErroEstoque::from(e)
                .duplicado_como(Conflito::NomeDeProdutoDuplicado(alteracoes.nome.clone().unwrap_or_default()))
        })?;
        let produto = transacao
            .buscar_produto(id)
            .await?
            .ok_or(ErroEstoque::NaoEncontrado(Recurso::Produto(id)))?;
        log::info!("Produto {} atualizado ({} campo(s))", id, alteracoes.quantidade_de_campos());
        Ok(produto)
    }
    .await;
    finalizar(transacao, resultado).await
}

async fn exigir_categoria(transacao: &mut dyn Transacao, id_categoria: i32) -> Result<(), ErroEstoque> {
    if guarda::categoria_existe(transacao, id_categoria).await? {
        Ok(())
    } else {
        Err(ErroEstoque::NaoEncontrado(Recurso::Categoria(id_categoria)))
    }
}
