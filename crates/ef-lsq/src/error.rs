use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("failed to allocate {bytes} bytes of estimator scratch memory")]
    Allocation { bytes: usize },
}
