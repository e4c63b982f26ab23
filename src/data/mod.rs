/// Data layer: layout rules, file resolution, loading and normalization.
///
/// Architecture:
/// ```text
///  splits/sequences/<n>/{train,test}.txt      labels/…/*.mat   features/<set>/…/*.mat
///        │                                           │                 │
///        ▼                                           ▼                 ▼
///   ┌──────────┐                               ┌──────────┐      ┌──────────┐
///   │  model   │  SplitManifest                │ variant  │ dirs │ resolve  │ X.mp4.mat ≈ X.mat
///   └──────────┘                               └──────────┘      └──────────┘
///        │                                           │                 │
///        ▼                                           ▼                 ▼
///   ┌───────────────────────────────────────────────────────────────────────┐
///   │ loader   read Y / X (mat) → transform (remap, smooth, orient, stride) │
///   │          → join on identifier → LoadedSplit { train, test }          │
///   └───────────────────────────────────────────────────────────────────────┘
/// ```

pub mod loader;
pub mod mat;
#[cfg(any(test, feature = "fixtures"))]
pub mod mat_writer;
pub mod model;
pub mod resolve;
pub mod transform;
pub mod variant;
