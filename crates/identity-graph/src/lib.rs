pub mod collusion;
pub mod community;
pub mod diversity;

pub use collusion::{find_collusion_clusters, CollusionCluster};
pub use community::{detect_communities, Community};
pub use diversity::{community_overlap, shannon_diversity};
