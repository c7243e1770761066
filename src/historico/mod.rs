// src/historico/mod.rs

// Registros de saldo antes/depois de cada movimentação
pub mod historico_structs;
// Rotas do histórico de estoque
pub mod historico_router;
