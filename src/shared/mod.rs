// src/shared/mod.rs

// Estruturas de resposta compartilhadas entre os módulos
pub mod shared_structs;
// Erros do núcleo de estoque
pub mod erros;
// Conversão dos erros em respostas HTTP
pub mod resposta_erro;
// Regras de validação dos campos de entrada
pub mod validacao;
