// src/movimentacoes/mod.rs

// Structs de movimentações de estoque
pub mod movimentacoes_structs;
// Rotas de movimentações
pub mod movimentacoes_router;
