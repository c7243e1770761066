// src/armazenamento/armazenamento_memoria.rs

//! Armazenamento em memória usado pelos testes.
//!
//! Cada transação segura o estado inteiro (mutex assíncrono) e trabalha numa
//! cópia; `confirmar` grava a cópia de volta, qualquer outro caminho a
//! descarta. Pontos de falha configuráveis simulam erros do banco no meio de
//! uma transação.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Mutex as MutexAssincrono, OwnedMutexGuard};

use super::{Armazenamento, ErroArmazenamento, ResultadoArmazenamento, Transacao};
use crate::categorias::categoria_structs::Categoria;
use crate::historico::historico_structs::{HistoricoDetalhado, RegistroHistorico};
use crate::movimentacoes::movimentacoes_structs::{DadosMovimentacao, Movimentacao, MovimentacaoCompleta};
use crate::produtos::produtos_structs::{AlteracoesProduto, FiltroProdutos, NovoProduto, OrdemProdutos, Produto};

/// Operação de escrita que pode ser configurada para falhar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PontoDeFalha {
    InserirMovimentacao,
    DefinirEstoque,
    InserirHistorico,
    RemoverMovimentacao,
    RemoverHistorico,
    Confirmar,
    /// A escrita de nome encontra um nome gravado por outra transação que
    /// a verificação prévia não viu.
    NomeConcorrente,
}

#[derive(Debug, Clone, Default)]
struct Estado {
    categorias: BTreeMap<i32, Categoria>,
    produtos: BTreeMap<i32, Produto>,
    movimentacoes: BTreeMap<i32, Movimentacao>,
    historico: BTreeMap<i32, RegistroHistorico>,
    ultimo_id: i32,
}

#[derive(Clone, Default)]
pub struct ArmazenamentoMemoria {
    estado: Arc<MutexAssincrono<Estado>>,
    falhas: Arc<Mutex<HashSet<PontoDeFalha>>>,
}

impl ArmazenamentoMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn falhar_em(&self, ponto: PontoDeFalha) {
        self.falhas.lock().unwrap().insert(ponto);
    }

    pub fn remover_falhas(&self) {
        self.falhas.lock().unwrap().clear();
    }

    /// Produto confirmado, lido fora de qualquer transação.
    pub async fn produto(&self, id: i32) -> Option<Produto> {
        self.estado.lock().await.produtos.get(&id).cloned()
    }

    pub async fn movimentacoes(&self) -> Vec<Movimentacao> {
        self.estado.lock().await.movimentacoes.values().cloned().collect()
    }

    pub async fn historico(&self) -> Vec<RegistroHistorico> {
        self.estado.lock().await.historico.values().cloned().collect()
    }
}

#[async_trait]
impl Armazenamento for ArmazenamentoMemoria {
    async fn iniciar(&self) -> ResultadoArmazenamento<Box<dyn Transacao>> {
        let guarda = self.estado.clone().lock_owned().await;
        let trabalho = guarda.clone();
        let falhas = self.falhas.lock().unwrap().clone();
        Ok(Box::new(TransacaoMemoria { guarda, trabalho, falhas }))
    }

    async fn verificar_conexao(&self) -> ResultadoArmazenamento<()> {
        Ok(())
    }
}

struct TransacaoMemoria {
    guarda: OwnedMutexGuard<Estado>,
    trabalho: Estado,
    falhas: HashSet<PontoDeFalha>,
}

impl TransacaoMemoria {
    fn verificar(&self, ponto: PontoDeFalha) -> ResultadoArmazenamento<()> {
        if self.falhas.contains(&ponto) {
            return Err(ErroArmazenamento::Indisponivel(format!("falha injetada em {:?}", ponto)));
        }
        Ok(())
    }

    // Restrições UNIQUE de `categorias.nome` e `produtos.nome`
    fn verificar_categoria_unica(&self, nome: &str, exceto: Option<i32>) -> ResultadoArmazenamento<()> {
        let repetido = self.trabalho.categorias.values().any(|c| c.nome == nome && Some(c.id) != exceto);
        if repetido || self.falhas.contains(&PontoDeFalha::NomeConcorrente) {
            return Err(ErroArmazenamento::Duplicado("categorias_nome_key".into()));
        }
        Ok(())
    }

    fn verificar_produto_unico(&self, nome: &str, exceto: Option<i32>) -> ResultadoArmazenamento<()> {
        let repetido = self.trabalho.produtos.values().any(|p| p.nome == nome && Some(p.id) != exceto);
        if repetido || self.falhas.contains(&PontoDeFalha::NomeConcorrente) {
            return Err(ErroArmazenamento::Duplicado("produtos_nome_key".into()));
        }
        Ok(())
    }

    fn proximo_id(&mut self) -> i32 {
        self.trabalho.ultimo_id += 1;
        self.trabalho.ultimo_id
    }

    fn com_categoria(&self, produto: &Produto) -> Produto {
        let mut produto = produto.clone();
        produto.categoria_nome = produto
            .id_categoria
            .and_then(|id| self.trabalho.categorias.get(&id))
            .map(|c| c.nome.clone());
        produto
    }

    fn movimentacoes_do_produto(&self, id_produto: i32) -> HashSet<i32> {
        self.trabalho
            .movimentacoes
            .values()
            .filter(|m| m.id_produto == id_produto)
            .map(|m| m.id)
            .collect()
    }

    fn remover_historico_onde(&mut self, filtro: impl Fn(&RegistroHistorico) -> bool) -> u64 {
        let antes = self.trabalho.historico.len();
        self.trabalho.historico.retain(|_, h| !filtro(h));
        (antes - self.trabalho.historico.len()) as u64
    }
}

fn bool_para_linhas(alterou: bool) -> u64 {
    if alterou {
        1
    } else {
        0
    }
}

#[async_trait]
impl Transacao for TransacaoMemoria {
    async fn listar_categorias(&mut self) -> ResultadoArmazenamento<Vec<Categoria>> {
        Ok(self.trabalho.categorias.values().cloned().collect())
    }

    async fn buscar_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>> {
        Ok(self.trabalho.categorias.get(&id).cloned())
    }

    async fn bloquear_categoria(&mut self, id: i32) -> ResultadoArmazenamento<Option<Categoria>> {
        // A transação já detém o estado inteiro
        self.buscar_categoria(id).await
    }

    async fn buscar_categoria_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Categoria>> {
        Ok(self.trabalho.categorias.values().find(|c| c.nome == nome).cloned())
    }

    async fn inserir_categoria(&mut self, nome: &str) -> ResultadoArmazenamento<Categoria> {
        self.verificar_categoria_unica(nome, None)?;
        let categoria = Categoria { id: self.proximo_id(), nome: nome.to_string() };
        self.trabalho.categorias.insert(categoria.id, categoria.clone());
        Ok(categoria)
    }

    async fn renomear_categoria(&mut self, id: i32, nome: &str) -> ResultadoArmazenamento<u64> {
        self.verificar_categoria_unica(nome, Some(id))?;
        let categoria = self.trabalho.categorias.get_mut(&id);
        let alterou = categoria.is_some();
        if let Some(categoria) = categoria {
            categoria.nome = nome.to_string();
        }
        Ok(bool_para_linhas(alterou))
    }

    async fn remover_categoria(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        Ok(bool_para_linhas(self.trabalho.categorias.remove(&id).is_some()))
    }

    async fn contar_produtos_da_categoria(&mut self, id: i32) -> ResultadoArmazenamento<i64> {
        Ok(self.trabalho.produtos.values().filter(|p| p.id_categoria == Some(id)).count() as i64)
    }

    async fn listar_produtos(&mut self, filtro: FiltroProdutos) -> ResultadoArmazenamento<Vec<Produto>> {
        let mut produtos: Vec<Produto> = self
            .trabalho
            .produtos
            .values()
            .filter(|p| filtro.id_categoria.map_or(true, |c| p.id_categoria == Some(c)))
            .filter(|p| !filtro.somente_ativos || p.ativo)
            .filter(|p| !filtro.estoque_baixo || p.estoque_atual <= p.estoque_minimo)
            .map(|p| self.com_categoria(p))
            .collect();
        match filtro.ordem {
            OrdemProdutos::Id => {}
            OrdemProdutos::Nome => produtos.sort_by(|a, b| a.nome.cmp(&b.nome)),
            OrdemProdutos::EstoqueCrescente => produtos.sort_by_key(|p| (p.estoque_atual, p.id)),
        }
        Ok(produtos)
    }

    async fn buscar_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>> {
        Ok(self.trabalho.produtos.get(&id).map(|p| self.com_categoria(p)))
    }

    async fn bloquear_produto(&mut self, id: i32) -> ResultadoArmazenamento<Option<Produto>> {
        self.buscar_produto(id).await
    }

    async fn buscar_produto_por_nome(&mut self, nome: &str) -> ResultadoArmazenamento<Option<Produto>> {
        Ok(self
            .trabalho
            .produtos
            .values()
            .find(|p| p.nome == nome)
            .map(|p| self.com_categoria(p)))
    }

    async fn inserir_produto(&mut self, novo: &NovoProduto) -> ResultadoArmazenamento<Produto> {
        self.verificar_produto_unico(&novo.nome, None)?;
        let produto = Produto {
            id: self.proximo_id(),
            nome: novo.nome.clone(),
            descricao: novo.descricao.clone(),
            id_categoria: novo.id_categoria,
            categoria_nome: None,
            material: novo.material.clone(),
            tamanho: novo.tamanho.clone(),
            peso: novo.peso.clone(),
            estoque_atual: novo.estoque_atual,
            estoque_minimo: novo.estoque_minimo,
            ativo: true,
        };
        self.trabalho.produtos.insert(produto.id, produto.clone());
        Ok(self.com_categoria(&produto))
    }

    async fn alterar_produto(&mut self, id: i32, alteracoes: &AlteracoesProduto) -> ResultadoArmazenamento<u64> {
        if let Some(nome) = &alteracoes.nome {
            self.verificar_produto_unico(nome, Some(id))?;
        }
        let Some(produto) = self.trabalho.produtos.get_mut(&id) else {
            return Ok(0);
        };
        if let Some(nome) = &alteracoes.nome {
            produto.nome = nome.clone();
        }
        if let Some(descricao) = &alteracoes.descricao {
            produto.descricao = descricao.clone();
        }
        if let Some(id_categoria) = alteracoes.id_categoria {
            produto.id_categoria = id_categoria;
        }
        if let Some(material) = &alteracoes.material {
            produto.material = material.clone();
        }
        if let Some(tamanho) = &alteracoes.tamanho {
            produto.tamanho = tamanho.clone();
        }
        if let Some(peso) = &alteracoes.peso {
            produto.peso = peso.clone();
        }
        if let Some(estoque_minimo) = alteracoes.estoque_minimo {
            produto.estoque_minimo = estoque_minimo;
        }
        Ok(1)
    }

    async fn definir_estoque(&mut self, id: i32, estoque_atual: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::DefinirEstoque)?;
        let produto = self.trabalho.produtos.get_mut(&id);
        let alterou = produto.is_some();
        if let Some(produto) = produto {
            produto.estoque_atual = estoque_atual;
        }
        Ok(bool_para_linhas(alterou))
    }

    async fn definir_ativo(&mut self, id: i32, ativo: bool) -> ResultadoArmazenamento<u64> {
        let produto = self.trabalho.produtos.get_mut(&id);
        let alterou = produto.is_some();
        if let Some(produto) = produto {
            produto.ativo = ativo;
        }
        Ok(bool_para_linhas(alterou))
    }

    async fn remover_produto(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        Ok(bool_para_linhas(self.trabalho.produtos.remove(&id).is_some()))
    }

    async fn contar_movimentacoes_do_produto(&mut self, id: i32) -> ResultadoArmazenamento<i64> {
        Ok(self.movimentacoes_do_produto(id).len() as i64)
    }

    async fn listar_movimentacoes(&mut self, id_produto: Option<i32>) -> ResultadoArmazenamento<Vec<Movimentacao>> {
        let mut movimentacoes: Vec<Movimentacao> = self
            .trabalho
            .movimentacoes
            .values()
            .filter(|m| id_produto.map_or(true, |id| m.id_produto == id))
            .cloned()
            .collect();
        movimentacoes.sort_by(|a, b| (b.data_movimentacao, b.id).cmp(&(a.data_movimentacao, a.id)));
        Ok(movimentacoes)
    }

    async fn listar_movimentacoes_completas(&mut self) -> ResultadoArmazenamento<Vec<MovimentacaoCompleta>> {
        let movimentacoes = self.listar_movimentacoes(None).await?;
        Ok(movimentacoes
            .into_iter()
            .filter_map(|m| {
                let produto = self.trabalho.produtos.get(&m.id_produto)?;
                let categoria_nome = produto
                    .id_categoria
                    .and_then(|id| self.trabalho.categorias.get(&id))
                    .map(|c| c.nome.clone());
                Some(MovimentacaoCompleta {
                    produto_nome: produto.nome.clone(),
                    produto_descricao: produto.descricao.clone(),
                    categoria_nome,
                    movimentacao: m,
                })
            })
            .collect())
    }

    async fn buscar_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<Option<Movimentacao>> {
        Ok(self.trabalho.movimentacoes.get(&id).cloned())
    }

    async fn inserir_movimentacao(&mut self, dados: &DadosMovimentacao) -> ResultadoArmazenamento<Movimentacao> {
        self.verificar(PontoDeFalha::InserirMovimentacao)?;
        let movimentacao = Movimentacao {
            id: self.proximo_id(),
            id_produto: dados.id_produto,
            tipo: dados.tipo,
            quantidade: dados.quantidade,
            data_movimentacao: dados.data_movimentacao,
            observacao: dados.observacao.clone(),
        };
        self.trabalho.movimentacoes.insert(movimentacao.id, movimentacao.clone());
        Ok(movimentacao)
    }

    async fn remover_movimentacao(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::RemoverMovimentacao)?;
        Ok(bool_para_linhas(self.trabalho.movimentacoes.remove(&id).is_some()))
    }

    async fn remover_movimentacoes_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::RemoverMovimentacao)?;
        let antes = self.trabalho.movimentacoes.len();
        self.trabalho.movimentacoes.retain(|_, m| m.id_produto != id_produto);
        Ok((antes - self.trabalho.movimentacoes.len()) as u64)
    }

    async fn listar_historico(&mut self) -> ResultadoArmazenamento<Vec<RegistroHistorico>> {
        Ok(self.trabalho.historico.values().rev().cloned().collect())
    }

    async fn listar_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<Vec<HistoricoDetalhado>> {
        let mut detalhado: Vec<HistoricoDetalhado> = self
            .trabalho
            .historico
            .values()
            .filter_map(|h| {
                let m = self.trabalho.movimentacoes.get(&h.id_movimentacao)?;
                (m.id_produto == id_produto).then(|| HistoricoDetalhado {
                    registro: h.clone(),
                    tipo: m.tipo,
                    quantidade: m.quantidade,
                    data_movimentacao: m.data_movimentacao,
                    observacao: m.observacao.clone(),
                })
            })
            .collect();
        detalhado.sort_by(|a, b| {
            (b.data_movimentacao, b.registro.id_movimentacao).cmp(&(a.data_movimentacao, a.registro.id_movimentacao))
        });
        Ok(detalhado)
    }

    async fn buscar_historico(&mut self, id: i32) -> ResultadoArmazenamento<Option<RegistroHistorico>> {
        Ok(self.trabalho.historico.get(&id).cloned())
    }

    async fn inserir_historico(
        &mut self,
        id_movimentacao: i32,
        estoque_anterior: i32,
        estoque_posterior: i32,
    ) -> ResultadoArmazenamento<RegistroHistorico> {
        self.verificar(PontoDeFalha::InserirHistorico)?;
        let registro = RegistroHistorico {
            id: self.proximo_id(),
            id_movimentacao,
            estoque_anterior,
            estoque_posterior,
        };
        self.trabalho.historico.insert(registro.id, registro.clone());
        Ok(registro)
    }

    async fn remover_historico(&mut self, id: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::RemoverHistorico)?;
        Ok(bool_para_linhas(self.trabalho.historico.remove(&id).is_some()))
    }

    async fn remover_historico_da_movimentacao(&mut self, id_movimentacao: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::RemoverHistorico)?;
        Ok(self.remover_historico_onde(|h| h.id_movimentacao == id_movimentacao))
    }

    async fn remover_historico_do_produto(&mut self, id_produto: i32) -> ResultadoArmazenamento<u64> {
        self.verificar(PontoDeFalha::RemoverHistorico)?;
        let movimentacoes = self.movimentacoes_do_produto(id_produto);
        Ok(self.remover_historico_onde(|h| movimentacoes.contains(&h.id_movimentacao)))
    }

    async fn confirmar(self: Box<Self>) -> ResultadoArmazenamento<()> {
        self.verificar(PontoDeFalha::Confirmar)?;
        let TransacaoMemoria { mut guarda, trabalho, .. } = *self;
        *guarda = trabalho;
        Ok(())
    }

    async fn desfazer(self: Box<Self>) -> ResultadoArmazenamento<()> {
        Ok(())
    }
}
