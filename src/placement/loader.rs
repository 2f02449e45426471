//! Model loading off the event thread.
//!
//! A [`ModelLoader`] hands each request to a [`ModelSource`] on a worker
//! thread and returns a [`PendingLoad`] that the controller polls once per
//! frame. Results travel back over a `futures` oneshot channel, so the scene
//! is only ever touched by whoever polls.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use futures::channel::oneshot;

use crate::{
    error::LoadError,
    gfx::scene::model::{ModelData, ModelPart},
};

/// Default colour for parts without a material
pub const DEFAULT_PART_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Anything that can turn a path into model data
pub trait ModelSource: Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<ModelData, LoadError>;
}

/// Loads Wavefront OBJ files, with diffuse colours from an accompanying MTL
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjModelSource;

impl ModelSource for ObjModelSource {
    fn load(&self, path: &Path) -> Result<ModelData, LoadError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|err| LoadError::Read {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("No materials for {}: {}", path.display(), err);
            Vec::new()
        });

        let parts: Vec<ModelPart> = models
            .into_iter()
            .filter(|model| !model.mesh.indices.is_empty())
            .map(|model| {
                let color = model
                    .mesh
                    .material_id
                    .and_then(|id| materials.get(id))
                    .and_then(|mtl| {
                        mtl.diffuse
                            .map(|[r, g, b]| [r, g, b, mtl.dissolve.unwrap_or(1.0)])
                    })
                    .unwrap_or(DEFAULT_PART_COLOR);

                ModelPart {
                    name: model.name,
                    positions: model.mesh.positions,
                    normals: model.mesh.normals,
                    indices: model.mesh.indices,
                    color,
                }
            })
            .collect();

        if parts.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        log::debug!("Parsed '{}' with {} parts", name, parts.len());
        Ok(ModelData { name, parts })
    }
}

/// Where a request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// On a dedicated worker thread per request
    Background,
    /// On the calling thread; the result is ready at the first poll
    Inline,
}

pub struct ModelLoader {
    source: Arc<dyn ModelSource>,
    mode: LoadMode,
}

impl ModelLoader {
    pub fn new(source: impl ModelSource, mode: LoadMode) -> Self {
        Self {
            source: Arc::new(source),
            mode,
        }
    }

    /// Background OBJ loader used by the application
    pub fn obj() -> Self {
        Self::new(ObjModelSource, LoadMode::Background)
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Starts loading `path`. The returned handle resolves exactly once.
    pub fn request(&self, path: impl Into<PathBuf>) -> PendingLoad {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();

        match self.mode {
            LoadMode::Inline => {
                // The receiver is alive in this scope
                let _ = sender.send(self.source.load(&path));
            }
            LoadMode::Background => {
                let source = Arc::clone(&self.source);
                let worker_path = path.clone();
                let spawned = thread::Builder::new()
                    .name("model-loader".to_string())
                    .spawn(move || {
                        let result = source.load(&worker_path);
                        if sender.send(result).is_err() {
                            log::debug!("Dropped load result for {}", worker_path.display());
                        }
                    });

                // A failed spawn drops the sender, which the poll reports as WorkerGone
                if let Err(err) = spawned {
                    log::error!("Failed to spawn loader thread: {}", err);
                }
            }
        }

        PendingLoad { path, receiver }
    }
}

/// A model load that has not been collected yet
pub struct PendingLoad {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<ModelData, LoadError>>,
}

impl PendingLoad {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check. `None` while the worker is still busy.
    pub fn try_recv(&mut self) -> Option<Result<ModelData, LoadError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(LoadError::WorkerGone)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_PART_OBJ: &str = "\
mtllib test.mtl
o back
v -1 0 -1
v 1 0 -1
v 1 2 -1
f 1 2 3
o seat
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
usemtl red
f 4 5 6 7
";

    const TEST_MTL: &str = "\
newmtl red
Kd 1.0 0.0 0.0
";

    struct Failing;

    impl ModelSource for Failing {
        fn load(&self, path: &Path) -> Result<ModelData, LoadError> {
            Err(LoadError::NotFound(path.display().to_string()))
        }
    }

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_obj_parts_and_colors() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(&dir, "test.mtl", TEST_MTL);
        let path = write_fixture(&dir, "chair.obj", TWO_PART_OBJ);

        let model = ObjModelSource.load(&path).unwrap();

        assert_eq!(model.name, "chair");
        assert_eq!(model.parts.len(), 2);
        assert_eq!(model.parts[0].name, "back");
        assert_eq!(model.parts[0].color, DEFAULT_PART_COLOR);
        assert_eq!(model.parts[1].name, "seat");
        // The quad is triangulated
        assert_eq!(model.parts[1].indices.len(), 6);
        assert_eq!(model.parts[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(model.triangle_count(), 3);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ObjModelSource.load(&dir.path().join("missing.obj"));
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_obj_without_faces_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "points.obj", "v 0 0 0\nv 1 0 0\n");
        assert!(matches!(ObjModelSource.load(&path), Err(LoadError::Empty(_))));
    }

    #[test]
    fn test_inline_load_ready_on_first_poll() {
        let loader = ModelLoader::new(Failing, LoadMode::Inline);
        let mut pending = loader.request("sofa.obj");

        assert_eq!(pending.path(), Path::new("sofa.obj"));
        assert_eq!(
            pending.try_recv(),
            Some(Err(LoadError::NotFound("sofa.obj".to_string())))
        );
    }

    #[test]
    fn test_background_load_resolves() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(&dir, "test.mtl", TEST_MTL);
        let path = write_fixture(&dir, "chair.obj", TWO_PART_OBJ);

        let loader = ModelLoader::obj();
        assert_eq!(loader.mode(), LoadMode::Background);
        let pending = loader.request(path);
        let model = futures::executor::block_on(pending.receiver)
            .unwrap()
            .unwrap();
        assert_eq!(model.parts.len(), 2);
    }

    #[test]
    fn test_dropped_sender_is_worker_gone() {
        let (sender, receiver) = oneshot::channel();
        drop(sender);
        let mut pending = PendingLoad {
            path: PathBuf::from("lost.obj"),
            receiver,
        };
        assert_eq!(pending.try_recv(), Some(Err(LoadError::WorkerGone)));
    }
}
