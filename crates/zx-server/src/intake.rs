use actix_multipart::Field;
use actix_multipart::Multipart;
use futures::TryStreamExt;
use std::path::Path;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use zx_auth::Rejection;
use zx_core::GAMEFILES_DIR;
use zx_core::ID;
use zx_core::THUMBNAILS_DIR;
use zx_records::Game;
use zx_records::User;

/// Writes multipart file parts under the upload root.
#[derive(Debug, Clone)]
pub struct Intake {
    root: PathBuf,
}

/// What a game upload request carried.
#[derive(Debug, Default)]
pub struct Upload {
    title: Option<String>,
    description: Option<String>,
    thumbnail: Option<PathBuf>,
    gamefile: Option<PathBuf>,
}

impl Intake {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    /// Creates the upload directories.
    pub async fn prepare(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(THUMBNAILS_DIR)).await?;
        tokio::fs::create_dir_all(self.root.join(GAMEFILES_DIR)).await
    }

    /// Streams every part of the request: `title` and `description` are
    /// collected as text, `thumbnail` and `gamefile` are written to disk,
    /// anything else is drained and ignored.
    pub async fn receive(&self, mut payload: Multipart) -> Result<Upload, Rejection> {
        let mut upload = Upload::default();
        while let Some(field) = payload.try_next().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_owned();
            let result = match name.as_str() {
                "title" => text(field).await.map(|t| upload.title = Some(t)),
                "description" => text(field).await.map(|t| upload.description = Some(t)),
                "thumbnail" if upload.thumbnail.is_none() => self
                    .store(field, THUMBNAILS_DIR)
                    .await
                    .map(|p| upload.thumbnail = p),
                "gamefile" if upload.gamefile.is_none() => self
                    .store(field, GAMEFILES_DIR)
                    .await
                    .map(|p| upload.gamefile = p),
                _ => drain(field).await,
            };
            if let Err(rejection) = result {
                upload.discard().await;
                return Err(rejection);
            }
        }
        Ok(upload)
    }

    /// Writes a file part, keeping the client's extension. Parts that are
    /// not files (no filename) are drained and yield nothing.
    async fn store(&self, mut field: Field, dir: &str) -> Result<Option<PathBuf>, Rejection> {
        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned)
        else {
            return drain(field).await.map(|_| None);
        };
        let ref folder = self.root.join(dir);
        tokio::fs::create_dir_all(folder)
            .await
            .map_err(Rejection::internal)?;
        let ref path = folder.join(format!(
            "{}{}",
            uuid::Uuid::now_v7().simple(),
            extension(&filename)
        ));
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(Rejection::internal)?;
        let written = async {
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                file.write_all(&chunk).await.map_err(Rejection::internal)?;
            }
            file.flush().await.map_err(Rejection::internal)
        }
        .await;
        match written {
            Ok(()) => {
                log::debug!("stored upload {}", path.display());
                Ok(Some(path.clone()))
            }
            Err(rejection) => {
                let _ = tokio::fs::remove_file(path).await;
                Err(rejection)
            }
        }
    }
}

impl Upload {
    /// Turns a complete upload into a game record. An incomplete upload is
    /// rejected and whatever it already wrote is removed.
    pub async fn publish(self, creator: ID<User>) -> Result<Game, Rejection> {
        match self {
            Upload {
                title: Some(title),
                description: Some(description),
                thumbnail: Some(thumbnail),
                gamefile: Some(gamefile),
            } if !title.is_empty() && !description.is_empty() => Ok(Game::new(
                title,
                description,
                creator,
                thumbnail.to_string_lossy().into_owned(),
                gamefile.to_string_lossy().into_owned(),
            )),
            incomplete => {
                incomplete.discard().await;
                Err(Rejection::bad("Missing fields or files"))
            }
        }
    }
    async fn discard(&self) {
        for path in [&self.thumbnail, &self.gamefile].into_iter().flatten() {
            if let Err(e) = tokio::fs::remove_file(path).await {
                log::warn!("could not remove upload {}: {}", path.display(), e);
            }
        }
    }
}

fn malformed(e: actix_multipart::MultipartError) -> Rejection {
    Rejection::bad(format!("Malformed upload: {}", e))
}

async fn text(field: Field) -> Result<String, Rejection> {
    let bytes = field
        .map_ok(|chunk| chunk.to_vec())
        .try_concat()
        .await
        .map_err(malformed)?;
    String::from_utf8(bytes).map_err(|_| Rejection::bad("Form fields must be UTF-8"))
}

async fn drain(field: Field) -> Result<(), Rejection> {
    field
        .try_for_each(|_| futures::future::ready(Ok(())))
        .await
        .map_err(malformed)
}

/// Alphanumeric extension of the client's filename, dot included.
fn extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}
