pub mod kmeans;
pub mod labels;
pub mod silhouette;
