pub mod btcmarkets;
