use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fs::{resolve, FileSystem};
use crate::history::HistoryStore;
use std::path::Path;

pub fn run<H, F>(history: &H, fs: &F, path: &Path) -> Result<CmdResult>
where
    H: HistoryStore + ?Sized,
    F: FileSystem + ?Sized,
{
    let path = resolve(fs, path);
    let mut result = CmdResult::default();
    match history.original_name_of(&path)? {
        Some(name) => result.add_message(CmdMessage::info(name)),
        None => result.add_message(CmdMessage::warning(format!(
            "No rename recorded for {}",
            path.display()
        ))),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::fs::memory::MemoryFileSystem;
    use crate::history::memory::fixtures::HistoryFixture;

    #[test]
    fn finds_earliest_name() {
        let history = HistoryFixture::new()
            .with_renames("/p", &[("Photo.jpg", "Temp_1.jpg")])
            .with_renames("/p", &[("Temp_1.jpg", "Final_1.jpg")])
            .store;

        let fs = MemoryFileSystem::new();

        let res = run(&history, &fs, Path::new("/p/Final_1.jpg")).unwrap();
        assert_eq!(res.messages[0].content, "Photo.jpg");

        let res = run(&history, &fs, Path::new("/p/other.jpg")).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn lookup_resolves_the_spelling_of_the_path() {
        let history = HistoryFixture::new()
            .with_renames("/x/photos", &[("a.jpg", "N_1.jpg")])
            .store;
        let fs = MemoryFileSystem::new().with_file("/x/photos/N_1.jpg");

        let res = run(&history, &fs, Path::new("/x/sub/../photos/./N_1.jpg")).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Info);
        assert_eq!(res.messages[0].content, "a.jpg");
    }
}
