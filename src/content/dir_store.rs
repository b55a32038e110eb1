use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::debug;

use crate::content::{PostId, PostRecord};
use crate::content::content_store::ContentStore;
use crate::content::front_matter::parse_post;

/// Reads collections from `root_dir/<collection>/**/*.{md,mdx}`.
pub struct DirContentStore {
    pub root_dir: PathBuf,
}

impl DirContentStore {
    pub fn new(root_dir: PathBuf) -> Self {
        DirContentStore {
            root_dir,
        }
    }

    fn retrieve_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        let entries = fs::read_dir(dir)?;
        for entry in entries {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                Self::retrieve_files(&entry.path(), files)?;
            } else if file_type.is_file() && Self::is_post_file(&entry.path()) {
                files.push(entry.path());
            }
        }
        Ok(())
    }

    fn is_post_file(path: &Path) -> bool {
        matches!(path.extension().and_then(|ext| ext.to_str()), Some("md") | Some("mdx"))
    }

    fn post_id(collection_dir: &Path, file_path: &Path) -> io::Result<PostId> {
        let relative = file_path.strip_prefix(collection_dir)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;

        let mut parts = vec![];
        for component in relative.components() {
            match component.as_os_str().to_str() {
                Some(part) => parts.push(part),
                None => return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("File name is not valid UTF-8 - file={}", file_path.display()))),
            }
        }

        Ok(PostId(parts.join("/")))
    }
}

impl ContentStore for DirContentStore {
    fn get_all_posts(&self, collection: &str) -> io::Result<Vec<PostRecord>> {
        let collection_dir = self.root_dir.join(collection);
        if !collection_dir.is_dir() {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("Collection {} not found in {}", collection, self.root_dir.display())));
        }

        let mut files = vec![];
        Self::retrieve_files(&collection_dir, &mut files)?;
        files.sort();

        let mut posts = Vec::with_capacity(files.len());
        for file_path in files {
            let id = Self::post_id(&collection_dir, &file_path)?;
            let raw_content = match fs::read_to_string(&file_path) {
                Ok(content) => content,
                Err(e) => return Err(io::Error::new(e.kind(), format!("Error reading post {}: {}", file_path.display(), e))),
            };

            let post = parse_post(id, collection, &raw_content, &file_path)?;
            debug!("Loaded post {} dated {}", post.id, post.data.date);
            posts.push(post);
        }

        Ok(posts)
    }
}
