pub mod gdual_std_ops;
