use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct ServerConfig {
    pub petstore_api_url: String,
    pub listen_addr: String,
    pub photo_storage_root: PathBuf,
    pub photo_public_prefix: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let petstore_api_url = env::var("PETSTORE_API_URL")
            .map_err(|_| "PETSTORE_API_URL must be set".to_string())?;

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let photo_storage_root = env::var("PHOTO_STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storage/public"));

        let photo_public_prefix =
            env::var("PHOTO_PUBLIC_PREFIX").unwrap_or_else(|_| "/storage".to_string());

        Ok(ServerConfig {
            petstore_api_url: petstore_api_url.trim_end_matches('/').to_string(),
            listen_addr,
            photo_storage_root,
            photo_public_prefix: photo_public_prefix.trim_end_matches('/').to_string(),
        })
    }
}
