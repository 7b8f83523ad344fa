pub mod amortization;
pub mod posting;
