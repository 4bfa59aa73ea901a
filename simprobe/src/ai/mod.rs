pub mod similarity;

pub use similarity::{
    SimilarityClient, SimilarityError, SimilarityInputs, SimilarityRequest, SimilarityScores,
    SimilarityService,
};
