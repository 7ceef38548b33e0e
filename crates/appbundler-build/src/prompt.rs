use std::path::Path;

/// Asks whether an existing build directory may be deleted.
pub trait OverwritePrompt {
    fn confirm_overwrite(&mut self, build_dir: &Path) -> std::io::Result<bool>;
}

/// Answers every prompt the same way (`--yes`, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl OverwritePrompt for FixedAnswer {
    fn confirm_overwrite(&mut self, _build_dir: &Path) -> std::io::Result<bool> {
        Ok(self.0)
    }
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&Path) -> std::io::Result<bool>,
{
    fn confirm_overwrite(&mut self, build_dir: &Path) -> std::io::Result<bool> {
        self(build_dir)
    }
}
