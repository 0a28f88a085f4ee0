use super::AppContext;
use crate::cli::{DeleteArgs, EditArgs, ExportArgs, ImportArgs, NewArgs, NoteIdArgs, SearchArgs};
use crate::core::data::Note;
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::format::preview;
use crate::utils::output::{OutputStyle, print_success};
use std::path::PathBuf;

fn not_found(id: i64) -> FlowResult {
    FlowResult::NotFound {
        item_type: "Note".to_string(),
        search_term: id.to_string(),
    }
}

fn require_content(content: &str) -> AppResult<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Note content is empty".to_string()));
    }
    Ok(content)
}

fn print_preview(content: &str) {
    println!("   >>> {}", OutputStyle::content(&preview(content)));
}

pub fn handle_new_command(ctx: &AppContext, args: &NewArgs) -> AppResult<()> {
    let content = require_content(&args.content)?;

    let id = ctx
        .router
        .new_note(content)
        .ok_or_else(|| ctx.storage_fault("create the note"))?;

    print_success(&format!("Created note {}", id));
    print_preview(content);
    ctx.logger().info(&format!("Note created: id={}", id));
    Ok(())
}

pub fn handle_list_command(ctx: &AppContext) -> AppResult<()> {
    let notes = ctx
        .router
        .read_notes()
        .ok_or_else(|| ctx.storage_fault("read notes"))?;

    if notes.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: format!(
                "notes in '{}'",
                ctx.router.paths().database_file.display()
            ),
        });
        return Ok(());
    }

    OutputStyle::print_note_list("📒 Notes", &notes);
    Ok(())
}

pub fn handle_show_command(ctx: &AppContext, args: &NoteIdArgs) -> AppResult<()> {
    match ctx.find_note(args.id)? {
        Some(note) => OutputStyle::print_note_detailed(&note),
        None => handle_flow(not_found(args.id)),
    }
    Ok(())
}

pub fn handle_edit_command(ctx: &AppContext, args: &EditArgs) -> AppResult<()> {
    let content = require_content(&args.content)?;

    match ctx.router.update_note(args.id, content) {
        Some(true) => {
            print_success(&format!("Note {} updated", args.id));
            print_preview(content);
            ctx.logger().info(&format!("Note updated: id={}", args.id));
            Ok(())
        }
        Some(false) => {
            handle_flow(not_found(args.id));
            Ok(())
        }
        None => Err(ctx.storage_fault("update the note")),
    }
}

pub fn handle_delete_command(ctx: &AppContext, args: &DeleteArgs) -> AppResult<()> {
    let Some(note) = ctx.find_note(args.id)? else {
        handle_flow(not_found(args.id));
        return Ok(());
    };

    if !args.force {
        println!("Note to delete:");
        println!("{}", OutputStyle::format_note_line(&note));
        if !ctx.confirm("\nAre you sure you want to delete this note?", false) {
            handle_flow(FlowResult::Cancelled("Note not deleted".to_string()));
            return Ok(());
        }
    }

    match ctx.router.delete_note(args.id) {
        Some(true) => {
            handle_flow(FlowResult::Success(format!("Note {} deleted", args.id)));
            ctx.logger().info(&format!("Note deleted: id={}", args.id));
            Ok(())
        }
        Some(false) => {
            handle_flow(not_found(args.id));
            Ok(())
        }
        None => Err(ctx.storage_fault("delete the note")),
    }
}

pub fn handle_search_command(ctx: &AppContext, args: &SearchArgs) -> AppResult<()> {
    let matches = ctx
        .router
        .search_notes(&args.query)
        .ok_or_else(|| ctx.storage_fault("search notes"))?;

    if matches.is_empty() {
        handle_flow(FlowResult::EmptyList {
            item_type: format!("notes containing '{}'", args.query),
        });
        return Ok(());
    }

    OutputStyle::print_note_list(
        &format!("🔎 Notes containing '{}'", args.query),
        &matches,
    );
    Ok(())
}

/// Plain-text export document for one note
pub fn format_export(note: &Note) -> String {
    format!(
        "ID: {}\nDate: {}\nContent:\n{}\n",
        note.id, note.timestamp, note.content
    )
}

pub fn default_export_path(id: i64) -> PathBuf {
    PathBuf::from(format!("note_{}.txt", id))
}

pub fn handle_export_command(ctx: &AppContext, args: &ExportArgs) -> AppResult<()> {
    let Some(note) = ctx.find_note(args.id)? else {
        handle_flow(not_found(args.id));
        return Ok(());
    };

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| default_export_path(note.id));

    std::fs::write(&path, format_export(&note)).map_err(|e| {
        ctx.logger()
            .error(&format!("Export of note {} failed: {}", note.id, e));
        AppError::Io(format!("Failed to write {}: {}", path.display(), e))
    })?;

    print_success(&format!("Note {} exported to {}", note.id, path.display()));
    ctx.logger()
        .info(&format!("Note exported: id={} -> {}", note.id, path.display()));
    Ok(())
}

pub fn handle_import_command(ctx: &AppContext, args: &ImportArgs) -> AppResult<()> {
    let raw = std::fs::read_to_string(&args.file).map_err(|e| {
        AppError::Io(format!("Failed to read {}: {}", args.file.display(), e))
    })?;

    let content = raw.trim();
    if content.is_empty() {
        return Err(AppError::Validation(format!(
            "{} is empty or has no text",
            args.file.display()
        )));
    }

    let id = ctx
        .router
        .new_note(content)
        .ok_or_else(|| ctx.storage_fault("import the file"))?;

    print_success(&format!("Imported {} as note {}", args.file.display(), id));
    print_preview(content);
    ctx.logger()
        .info(&format!("File imported: {} -> id={}", args.file.display(), id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;
    use crate::core::registry::tests::RecordingGenerator;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(temp: &TempDir) -> AppContext {
        context(temp, Arc::new(RecordingGenerator::default()))
    }

    #[test]
    fn test_new_rejects_blank_content() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx(&temp);

        let result = handle_new_command(&ctx, &NewArgs { content: "  ".to_string() });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(ctx.router.read_notes().unwrap().is_empty());
    }

    #[test]
    fn test_edit_and_delete_flow() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx(&temp);

        handle_new_command(&ctx, &NewArgs { content: "draft".to_string() }).unwrap();
        let id = ctx.router.read_notes().unwrap()[0].id;

        handle_edit_command(&ctx, &EditArgs { id, content: "final".to_string() }).unwrap();
        assert_eq!(ctx.find_note(id).unwrap().unwrap().content, "final");

        assert!(matches!(
            handle_edit_command(&ctx, &EditArgs { id, content: String::new() }),
            Err(AppError::Validation(_))
        ));

        // Unknown ids are reported, not failed
        handle_delete_command(&ctx, &DeleteArgs { id: 999, force: true }).unwrap();

        handle_delete_command(&ctx, &DeleteArgs { id, force: false }).unwrap();
        assert!(ctx.find_note(id).unwrap().is_none());
    }

    #[test]
    fn test_export_then_import() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx(&temp);

        handle_new_command(&ctx, &NewArgs { content: "remember the milk".to_string() }).unwrap();
        let note = ctx.router.read_notes().unwrap().remove(0);

        let exported = temp.path().join("out.txt");
        handle_export_command(&ctx, &ExportArgs { id: note.id, file: Some(exported.clone()) }).unwrap();
        let text = std::fs::read_to_string(&exported).unwrap();
        assert_eq!(text, format_export(&note));
        assert!(text.starts_with(&format!("ID: {}\n", note.id)));

        let source = temp.path().join("in.txt");
        std::fs::write(&source, "\n  imported text  \n").unwrap();
        handle_import_command(&ctx, &ImportArgs { file: source }).unwrap();

        let notes = ctx.router.read_notes().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].content, "imported text");
    }

    #[test]
    fn test_import_errors() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx(&temp);

        let missing = ImportArgs { file: temp.path().join("missing.txt") };
        assert!(matches!(handle_import_command(&ctx, &missing), Err(AppError::Io(_))));

        let blank = temp.path().join("blank.txt");
        std::fs::write(&blank, " \n").unwrap();
        assert!(matches!(
            handle_import_command(&ctx, &ImportArgs { file: blank }),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_default_export_path() {
        assert_eq!(default_export_path(12), PathBuf::from("note_12.txt"));
    }
}
