use super::AppContext;
use crate::cli::{AskArgs, ExecArgs, NoteIdArgs, TranslateArgs};
use crate::core::data::Note;
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::format::preview;
use crate::utils::output::{OutputStyle, print_success, print_warning};
use crate::utils::template::{Bindings, bind, parse_variables};

/// Run `prompt` on note `id` with `bindings` plus the note as `{content}`.
///
/// `Ok(None)` after reporting a missing note or prompt.
async fn run_on_note(
    ctx: &mut AppContext,
    prompt: &str,
    id: i64,
    mut bindings: Bindings,
) -> AppResult<Option<(Note, String)>> {
    let Some(note) = ctx.find_note(id)? else {
        handle_flow(FlowResult::NotFound {
            item_type: "Note".to_string(),
            search_term: id.to_string(),
        });
        return Ok(None);
    };

    bindings
        .entry("content".to_string())
        .or_insert_with(|| note.content.clone());

    let registry = ctx.router.prompts()?;
    if registry.get(prompt).is_none() {
        handle_flow(FlowResult::NotFound {
            item_type: "Prompt".to_string(),
            search_term: prompt.to_string(),
        });
        return Ok(None);
    }

    println!(
        "{}",
        OutputStyle::muted(&format!("Running '{}' on note {}: {}", prompt, id, preview(&note.content)))
    );

    let result = registry.execute(prompt, &bindings).await?;
    match result {
        Some(text) => {
            ctx.logger()
                .info(&format!("Prompt '{}' applied to note {}", prompt, id));
            Ok(Some((note, text.trim().to_string())))
        }
        None => {
            ctx.logger()
                .error(&format!("Prompt '{}' failed for note {}", prompt, id));
            Err(AppError::Backend(format!(
                "Prompt '{}' produced no result (details in {})",
                prompt,
                ctx.router.paths().prompts_log.display()
            )))
        }
    }
}

/// Store `content` as a new note after confirmation
fn offer_new_note(ctx: &AppContext, question: &str, content: &str) -> AppResult<()> {
    if !ctx.confirm(question, false) {
        return Ok(());
    }

    let id = ctx
        .router
        .new_note(content)
        .ok_or_else(|| ctx.storage_fault("save the result"))?;
    print_success(&format!("Saved as note {}", id));
    ctx.logger().info(&format!("AI result saved: id={}", id));
    Ok(())
}

pub async fn handle_improve_command(ctx: &mut AppContext, args: &NoteIdArgs) -> AppResult<()> {
    let Some((note, text)) = run_on_note(ctx, "improve", args.id, Bindings::new()).await? else {
        return Ok(());
    };

    OutputStyle::print_result("Improved note", &text);

    if ctx.confirm("Replace the original note with the improved version?", false) {
        match ctx.router.update_note(note.id, &text) {
            Some(true) => print_success(&format!("Note {} updated", note.id)),
            Some(false) => print_warning(&format!("Note {} no longer exists", note.id)),
            None => return Err(ctx.storage_fault("update the note")),
        }
    }
    Ok(())
}

pub async fn handle_summarize_command(ctx: &mut AppContext, args: &NoteIdArgs) -> AppResult<()> {
    let Some((note, text)) = run_on_note(ctx, "summarize", args.id, Bindings::new()).await? else {
        return Ok(());
    };

    OutputStyle::print_result("Summary", &text);
    offer_new_note(
        ctx,
        "Save the summary as a new note?",
        &format!("[Summary of note {}]\n{}", note.id, text),
    )
}

pub async fn handle_translate_command(ctx: &mut AppContext, args: &TranslateArgs) -> AppResult<()> {
    let bindings = bind(&[("language", args.language.as_str())]);
    let Some((_, text)) = run_on_note(ctx, "translate", args.id, bindings).await? else {
        return Ok(());
    };

    OutputStyle::print_result(&format!("Translation to {}", args.language), &text);
    offer_new_note(
        ctx,
        "Save the translation as a new note?",
        &format!("[Translation to {}]\n{}", args.language, text),
    )
}

pub async fn handle_ask_command(ctx: &mut AppContext, args: &AskArgs) -> AppResult<()> {
    let bindings = bind(&[("question", args.question.as_str())]);
    if let Some((_, text)) = run_on_note(ctx, "ask", args.id, bindings).await? {
        OutputStyle::print_result("Answer", &text);
    }
    Ok(())
}

pub async fn handle_exec_command(ctx: &mut AppContext, args: &ExecArgs) -> AppResult<()> {
    let bindings = parse_variables(&args.vars)?;
    if let Some((_, text)) = run_on_note(ctx, &args.prompt, args.id, bindings).await? {
        OutputStyle::print_result(&args.prompt, &text);
    }
    Ok(())
}
