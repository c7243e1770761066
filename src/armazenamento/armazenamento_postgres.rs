// src/armazenamento/armazenamento_postgres.rs

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Pool, Postgres, QueryBuilder, Transaction};

use super::{Armazenamento, ErroArmazenamento, ResultadoArmazenamento, Transacao};
use crate::categorias::categoria_structs::Categoria;
use crate::historico::historico_structs::{HistoricoDetalhado, RegistroHistorico};
use crate::movimentacoes::movimentacoes_structs::{DadosMovimentacao, Movimentacao, MovimentacaoCompleta};
use crate::produtos::produtos_structs::{AlteracoesProduto, FiltroProdutos, NovoProduto, OrdemProdutos, Produto};

const SELECT_CATEGORIA: &str = "SELECT id_categoria AS id, nome FROM categorias";

// Produto sempre acompanhado do nome da categoria
const SELECT_PRODUTO: &str = "SELECT p.id_produto AS id, p.nome, p.descricao, p.id_categoria, \
     c.nome AS categoria_nome, p.material, p.tamanho, p.peso, p.estoque_atual, p.estoque_minimo, p.ativo \
     FROM produtos p LEFT JOIN categorias c ON c.id_categoria = p.id_categoria";

const SELECT_MOVIMENTACAO: &str = "SELECT id_movimentacao AS id, id_produto, tipo, quantidade, \
     data_movimentacao, observacao FROM movimentacoes";

const SELECT_HISTORICO: &str = "SELECT id_historico AS id, id_movimentacao, estoque_anterior, \
     estoque_posterior FROM historico_estoque";

/// Armazenamento sobre o pool de conexões PostgreSQL.
pub struct PgArmazenamento {
    db_pool: Pool<Postgres>,
}

impl PgArmazenamento {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        PgArmazenamento { db_pool }
    }
}

#[async_trait]
impl Armazenamento for PgArmazenamento {
    async fn iniciar(&self) -> ResultadoArmazenamento<Box<dyn Transacao>> {
        let transaction = self.db_pool.begin().await?;
        Ok(Box::new(PgTransacao { transaction }))
    }

    async fn verificar_conexao(&self) -> ResultadoArmazenamento<()> {
        query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

/// Transação PostgreSQL. Se for descartada sem commit, o sqlx faz rollback.
struct PgTransacao {
    transaction: Transaction<'static, Postgres>,
}

#[async_trait]
impl Transacao for PgTransacao {
    async fn listar_categorias(&mut self) -> ResultadoArmazenamento<Vec<Categoria>> {
        let categorias = query_as::<_, Categoria>(&format!("{} ORDER BY id_categoria", SELECT_CATEGORIA))
            .fetch_all(&mut *self.transaction)
            .await?;
        Ok(categorias)
    }

    async fn buscar_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>> {
        let categoria = query_as::<_, Categoria>(&format!("{} WHERE id_categoria = $1", SELECT_CATEGORIA))
            .bind(id)
            .fetch_optional(&mut *self.transaction)
            .await?;
        Ok(categoria)
    }

    async fn bloquear_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>> {
        // FOR UPDATE: inserções de produtos que referenciam esta categoria esperam o fim da transação
        let categoria =
            query_as::<_, Categoria>(&format!("{} WHERE id_categoria = $1 FOR UPDATE", SELECT_CATEGORIA))
                .bind(id)
                .fetch_optional(&mut *self.transaction)
                .await?;
        Ok(categoria)
    }

    async fn buscar_categoria_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Categoria>> {
        let categoria = query_as::<_, Categoria>(&format!("{} WHERE nome = $1", SELECT_CATEGORIA))
            .bind(nome)
            .fetch_optional(&mut *self.transaction)
            .await?;
        Ok(categoria)
    }

    async fn inserir_categoria(&mut self, nome: &str) -> ResultadoArmazenamento<Categoria> {
        let categoria = query_as::<_, Categoria>(
            "INSERT INTO categorias (nome) VALUES ($1) RETURNING id_categoria AS id, nome",
        )
        .bind(nome)
        .fetch_one(&mut *self.transaction)
        .await?;
        Ok(categoria)
    }

    async fn renomear_categoria(&mut self, id: i32, nome: &str) -> ResultadoArmazenamento<u64> {
        let result = query("UPDATE categorias SET nome = $1 WHERE id_categoria = $2")
            .bind(nome)
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remover_categoria(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM categorias WHERE id_categoria = $1")
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn contar_produtos_da_categoria(&mut self, id: i32) -> ResultadoArmazenamento<i64> {
        let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM produtos WHERE id_categoria = $1")
            .bind(id)
            .fetch_one(&mut *self.transaction)
            .await?;
        Ok(total)
    }

    async fn listar_produtos(&mut self, filtro: FiltroProdutos) -> ResultadoArmazenamento<Vec<Produto>> {
        let mut consulta: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PRODUTO);
        consulta.push(" WHERE TRUE");
        if let Some(id_categoria) = filtro.id_categoria {
            consulta.push(" AND p.id_categoria = ");
            consulta.push_bind(id_categoria);
        }
        if filtro.somente_ativos {
            consulta.push(" AND p.ativo");
        }
        if filtro.estoque_baixo {
            consulta.push(" AND p.estoque_atual <= p.estoque_minimo");
        }
        consulta.push(match filtro.ordem {
            OrdemProdutos::Id => " ORDER BY p.id_produto",
            OrdemProdutos::Nome => " ORDER BY p.nome",
            OrdemProdutos::EstoqueCrescente => " ORDER BY p.estoque_atual ASC, p.id_produto",
        });

        let produtos = consulta
            .build_query_as::<Produto>()
            .fetch_all(&mut *self.transaction)
            .await?;
        Ok(produtos)
    }

    async fn buscar_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>> {
        let produto = query_as::<_, Produto>(&format!("{} WHERE p.id_produto = $1", SELECT_PRODUTO))
            .bind(id)
            .fetch_optional(&mut *self.transaction)
            .await?;
        Ok(produto)
    }

    async fn bloquear_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>> {
        // FOR UPDATE OF p: bloqueia só a linha do produto (a categoria pode ser nula no LEFT JOIN).
        // Duas movimentações simultâneas no mesmo produto nunca leem o mesmo saldo.
        let produto =
            query_as::<_, Produto>(&format!("{} WHERE p.id_produto = $1 FOR UPDATE OF p", SELECT_PRODUTO))
                .bind(id)
                .fetch_optional(&mut *self.transaction)
                .await?;
        Ok(produto)
    }

    async fn buscar_produto_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Produto>> {
        let produto = query_as::<_, Produto>(&format!("{} WHERE p.nome = $1", SELECT_PRODUTO))
            .bind(nome)
            .fetch_optional(&mut *self.transaction)
            .await?;
        Ok(produto)
    }

    async fn inserir_produto(&mut self, novo: &NovoProduto) -> ResultadoArmazenamento<Produto> {
        let id = query_scalar::<_, i32>(
            "INSERT INTO produtos \
             (nome, descricao, id_categoria, material, tamanho, peso, estoque_atual, estoque_minimo, ativo) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE) RETURNING id_produto",
        )
        .bind(&novo.nome)
        .bind(&novo.descricao)
        .bind(novo.id_categoria)
        .bind(&novo.material)
        .bind(&novo.tamanho)
        .bind(&novo.peso)
        .bind(novo.estoque_atual)
        .bind(novo.estoque_minimo)
        .fetch_one(&mut *self.transaction)
        .await?;

        self.buscar_produto(id)
            .await?
            .ok_or(ErroArmazenamento::Banco(sqlx::Error::RowNotFound))
    }

    async fn alterar_produto(&mut self, id: i32, alteracoes: &AlteracoesProduto) -> ResultadoArmazenamento<u64> {
        if alteracoes.esta_vazia() {
            return Ok(0);
        }

        // Um único UPDATE parametrizado apenas com os campos presentes
        let mut consulta: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE produtos SET ");
        {
            let mut campos = consulta.separated(", ");
            if let Some(nome) = &alteracoes.nome {
                campos.push("nome = ");
                campos.push_bind_unseparated(nome.clone());
            }
            if let Some(descricao) = &alteracoes.descricao {
                campos.push("descricao = ");
                campos.push_bind_unseparated(descricao.clone());
            }
            if let Some(id_categoria) = alteracoes.id_categoria {
                campos.push("id_categoria = ");
                campos.push_bind_unseparated(id_categoria);
            }
            if let Some(material) = &alteracoes.material {
                campos.push("material = ");
                campos.push_bind_unseparated(material.clone());
            }
            if let Some(tamanho) = &alteracoes.tamanho {
                campos.push("tamanho = ");
                campos.push_bind_unseparated(tamanho.clone());
            }
            if let Some(peso) = &alteracoes.peso {
                campos.push("peso = ");
                campos.push_bind_unseparated(peso.clone());
            }
            if let Some(estoque_minimo) = alteracoes.estoque_minimo {
                campos.push("estoque_minimo = ");
                campos.push_bind_unseparated(estoque_minimo);
            }
        }
        consulta.push(" WHERE id_produto = ");
        consulta.push_bind(id);

        let result = consulta.build().execute(&mut *self.transaction).await?;
        Ok(result.rows_affected())
    }

    async fn definir_estoque(&mut self, id: i32, estoque_atual: i32) -> ResultadoArmazenamento<u64> {
        let result = query("UPDATE produtos SET estoque_atual = $1 WHERE id_produto = $2")
            .bind(estoque_atual)
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn definir_ativo(&mut self, id: i32, ativo: bool) -> ResultadoArmazenamento<u64> {
        let result = query("UPDATE produtos SET ativo = $1 WHERE id_produto = $2")
            .bind(ativo)
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remover_produto(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM produtos WHERE id_produto = $1")
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn contar_movimentacoes_do_produto(&mut self, id: i32) -> ResultadoArmazenamento<i64> {
        let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM movimentacoes WHERE id_produto = $1")
            .bind(id)
            .fetch_one(&mut *self.transaction)
            .await?;
        Ok(total)
    }

    async fn listar_movimentacoes(&mut self, id_produto: Option<i32>) -> ResultadoArmazenamento<Vec<Movimentacao>> {
        let mut consulta: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_MOVIMENTACAO);
        if let Some(id_produto) = id_produto {
            consulta.push(" WHERE id_produto = ");
            consulta.push_bind(id_produto);
        }
        consulta.push(" ORDER BY data_movimentacao DESC, id_movimentacao DESC");

        let movimentacoes = consulta
            .build_query_as::<Movimentacao>()
            .fetch_all(&mut *self.transaction)
            .await?;
        Ok(movimentacoes)
    }

    async fn listar_movimentacoes_completas(&mut self) -> ResultadoArmazenamento<Vec<MovimentacaoCompleta>> {
        let movimentacoes = query_as::<_, MovimentacaoCompleta>(
            "SELECT m.id_movimentacao AS id, m.id_produto, m.tipo, m.quantidade, m.data_movimentacao, m.observacao, \
             p.nome AS produto_nome, p.descricao AS produto_descricao, c.nome AS categoria_nome \
             FROM movimentacoes m \
             INNER JOIN produtos p ON p.id_produto = m.id_produto \
             LEFT JOIN categorias c ON c.id_categoria = p.id_categoria \
             ORDER BY m.data_movimentacao DESC, m.id_movimentacao DESC",
        )
        .fetch_all(&mut *self.transaction)
        .await?;
        Ok(movimentacoes)
    }

    async fn buscar_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<Option<Movimentacao>> {
        let movimentacao =
            query_as::<_, Movimentacao>(&format!("{} WHERE id_movimentacao = $1", SELECT_MOVIMENTACAO))
                .bind(id)
                .fetch_optional(&mut *self.transaction)
                .await?;
        Ok(movimentacao)
    }

    async fn inserir_movimentacao(&mut self, dados: &DadosMovimentacao) -> ResultadoArmazenamento<Movimentacao> {
        let movimentacao = query_as::<_, Movimentacao>(
            "INSERT INTO movimentacoes (id_produto, tipo, quantidade, data_movimentacao, observacao) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id_movimentacao AS id, id_produto, tipo, quantidade, data_movimentacao, observacao",
        )
        .bind(dados.id_produto)
        .bind(dados.tipo.como_str())
        .bind(dados.quantidade)
        .bind(dados.data_movimentacao)
        .bind(&dados.observacao)
        .fetch_one(&mut *self.transaction)
        .await?;
        Ok(movimentacao)
    }

    async fn remover_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM movimentacoes WHERE id_movimentacao = $1")
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remover_movimentacoes_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM movimentacoes WHERE id_produto = $1")
            .bind(id_produto)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn listar_historico(&mut self) -> ResultadoArmazenamento<Vec<RegistroHistorico>> {
        let historico = query_as::<_, RegistroHistorico>(&format!("{} ORDER BY id_historico DESC", SELECT_HISTORICO))
            .fetch_all(&mut *self.transaction)
            .await?;
        Ok(historico)
    }

    async fn listar_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<Vec<HistoricoDetalhado>> {
        let historico = query_as::<_, HistoricoDetalhado>(
            "SELECT h.id_historico AS id, h.id_movimentacao, h.estoque_anterior, h.estoque_posterior, \
             m.tipo, m.quantidade, m.data_movimentacao, m.observacao \
             FROM historico_estoque h \
             INNER JOIN movimentacoes m ON m.id_movimentacao = h.id_movimentacao \
             WHERE m.id_produto = $1 \
             ORDER BY m.data_movimentacao DESC, m.id_movimentacao DESC",
        )
        .bind(id_produto)
        .fetch_all(&mut *self.transaction)
        .await?;
        Ok(historico)
    }

    async fn buscar_historico(&mut self, id: i32) -> ResultadoArmazenamento<Option<RegistroHistorico>> {
        let registro = query_as::<_, RegistroHistorico>(&format!("{} WHERE id_historico = $1", SELECT_HISTORICO))
            .bind(id)
            .fetch_optional(&mut *self.transaction)
            .await?;
        Ok(registro)
    }

    async fn inserir_historico(
        &mut self,
        id_movimentacao: i32,
        estoque_anterior: i32,
        estoque_posterior: i32,
    ) -> ResultadoArmazenamento<RegistroHistorico> {
        let registro = query_as::<_, RegistroHistorico>(
            "INSERT INTO historico_estoque (id_movimentacao, estoque_anterior, estoque_posterior) \
             VALUES ($1, $2, $3) \
             RETURNING id_historico AS id, id_movimentacao, estoque_anterior, estoque_posterior",
        )
        .bind(id_movimentacao)
        .bind(estoque_anterior)
        .bind(estoque_posterior)
        .fetch_one(&mut *self.transaction)
        .await?;
        Ok(registro)
    }

    async fn remover_historico(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM historico_estoque WHERE id_historico = $1")
            .bind(id)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remover_historico_da_movimentacao(&mut self, id_movimentacao: i32) -> ResultadoArmazenamento<u64> {
        let result = query("DELETE FROM historico_estoque WHERE id_movimentacao = $1")
            .bind(id_movimentacao)
            .execute(&mut *self.transaction)
            .await?;
        Ok(result.rows_affected())
    }

    async fn remover_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64> {
        let result = query(
            "DELETE FROM historico_estoque h USING movimentacoes m \
             WHERE h.id_movimentacao = m.id_movimentacao AND m.id_produto = $1",
        )
        .bind(id_produto)
        .execute(&mut *self.transaction)
        .await?;
        Ok(result.rows_affected())
    }

    async fn confirmar(self: Box<Self>) -> ResultadoArmazenamento<()> {
        self.transaction.commit().await?;
        Ok(())
    }

    async fn desfazer(self: Box<Self>) -> ResultadoArmazenamento<()> {
        self.transaction.rollback().await?;
        Ok(())
    }
}
