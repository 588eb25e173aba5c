pub mod neat;
