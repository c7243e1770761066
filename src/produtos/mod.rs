// src/produtos/mod.rs

// Structs de produtos (entidade, requisições e filtros)
pub mod produtos_structs;
// Rotas de produtos
pub mod produtos_router;
