use crate::constants::UNSUPPORTED_GLTF_EXTENSIONS;
use thiserror::Error;

/// Failure of a single asset-load operation. Recorded in the load report;
/// never blocks the ready transition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("could not decode {label}: {reason}")]
    Decode { label: String, reason: String },
    #[error("asset requires unsupported extension {0}")]
    UnsupportedExtension(String),
    #[error("model contains no scene")]
    EmptyModel,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl LoadError {
    /// Fails on the first required glTF extension the loader cannot decode.
    pub fn check_required_extensions<'a>(
        required: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), LoadError> {
        match required
            .into_iter()
            .find(|ext| UNSUPPORTED_GLTF_EXTENSIONS.contains(ext))
        {
            Some(ext) => Err(LoadError::UnsupportedExtension(ext.to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("a scene is already installed; nodes are classified once per session")]
    AlreadyInstalled,
    #[error("unknown modal `{0}`")]
    UnknownModal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draco_models_are_rejected() {
        let required = ["KHR_materials_unlit", "KHR_draco_mesh_compression"];
        assert_eq!(
            LoadError::check_required_extensions(required),
            Err(LoadError::UnsupportedExtension(
                "KHR_draco_mesh_compression".into()
            ))
        );
    }

    #[test]
    fn plain_models_pass() {
        assert_eq!(LoadError::check_required_extensions(std::iter::empty()), Ok(()));
        assert_eq!(
            LoadError::check_required_extensions(["KHR_materials_unlit"]),
            Ok(())
        );
    }
}
