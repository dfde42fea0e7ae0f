//! Command handlers for CLI subcommands.

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tanke_core::{lesson_plan, QuestionBank};
use tanke_models::Dimension;
use tanke_tutor::studio::AUDIO_SAMPLE_RATE;
use rustyline::DefaultEditor;
use tanke_tutor::{decode_pcm16, score_quiz, GeminiClient, QuizQuestion, Studio};
use tracing::info;

use crate::cli::{Commands, OutputFormat, StudioTool};
use crate::error::Result;

/// Load the question bank from `path`, or the built-in bank.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(path) => {
            let bank = QuestionBank::from_path(path)?;
            info!(path = %path.display(), questions = bank.len(), "Loaded question bank");
            Ok(bank)
        }
        None => Ok(QuestionBank::buoyancy()),
    }
}

/// Execute a non-interactive CLI command.
pub fn execute(command: Commands, bank: Arc<QuestionBank>) -> Result<()> {
    match command {
        Commands::Teacher { limit } => cmd_teacher(&bank, limit),
        Commands::Questions { dimension, format } => cmd_questions(&bank, dimension, format),
        Commands::Studio {
            tool,
            dimension,
            topic,
            output,
            play,
        } => cmd_studio(tool, dimension, &topic, output.as_deref(), play),
        Commands::Learn => {
            // REPL is handled separately in main
            Ok(())
        }
    }
}

fn cmd_teacher(bank: &QuestionBank, limit: usize) -> Result<()> {
    let rows = lesson_plan(bank, limit);

    println!("教学设计 · 5D 问题链");
    println!();
    println!("{:<4}  {:<6}  {:<8}  {:<6}  QUESTION", "ID", "DIM", "CONTEXT", "EXPECT");
    println!("{}", "-".repeat(80));
    for row in &rows {
        println!(
            "{:<4}  {:<6}  {:<8}  {:>5}%  {}",
            row.id,
            row.dimension.label(),
            truncate(&row.context, 8),
            row.expected_mastery,
            truncate(&row.question, 40)
        );
    }
    println!("\n{} question(s)", rows.len());
    Ok(())
}

fn cmd_questions(
    bank: &QuestionBank,
    dimension: Option<Dimension>,
    format: OutputFormat,
) -> Result<()> {
    let items: Vec<_> = match dimension {
        Some(d) => bank.questions_for(d).iter().collect(),
        None => bank.iter().collect(),
    };

    match format {
        OutputFormat::Table => {
            for d in Dimension::ALL {
                let group: Vec<_> = items.iter().filter(|q| q.dimension == d).collect();
                if group.is_empty() {
                    continue;
                }
                println!("【{}】{}", d.label(), d.description());
                for (i, item) in group.iter().enumerate() {
                    println!("  {}. [{}] {}", i + 1, item.context, item.question);
                }
                println!();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}

fn cmd_studio(
    tool: StudioTool,
    dimension: Dimension,
    topic: &str,
    output: Option<&Path>,
    play: bool,
) -> Result<()> {
    let client = GeminiClient::from_env()?;
    let studio = Studio::new(Arc::new(client));
    let runtime = tokio::runtime::Runtime::new()?;

    info!(?tool, dimension = %dimension.code(), topic = %topic, "Running Studio tool");
    println!("Generating {:?} for 【{}】...", tool, dimension.label());

    match tool {
        StudioTool::Quiz => {
            let quiz = runtime.block_on(studio.quiz(topic, dimension))?;
            if play {
                play_quiz(&quiz)?;
            } else {
                print_quiz(&quiz);
            }
        }
        StudioTool::Flashcards => {
            for card in runtime.block_on(studio.flashcards(topic, dimension))? {
                println!("\n■ {}\n  {}", card.front, card.back);
            }
        }
        StudioTool::Slides => {
            let slides = runtime.block_on(studio.slides(topic, dimension))?;
            for (i, slide) in slides.iter().enumerate() {
                println!("\n[{}] {}", i + 1, slide.title);
                for bullet in &slide.bullets {
                    println!("  • {}", bullet);
                }
                println!("  (配图: {})", slide.visual_prompt);
            }
            // Only the cover slide is illustrated, and only when asked to save it.
            if let (Some(path), Some(cover)) = (output, slides.first()) {
                let url = runtime.block_on(studio.slide_image(&cover.visual_prompt))?;
                write_output(Some(path), &data_url_bytes(&url)?)?;
            }
        }
        StudioTool::Game => {
            let game = runtime.block_on(studio.game(topic, dimension))?;
            println!("\n{}\n任务：{}\n{}", game.title, game.mission, game.context);
            for (i, option) in game.options.iter().enumerate() {
                let marker = if option.is_correct { "✓" } else { "✗" };
                println!("\n  {}. {} {}", option_letter(i), option.label, marker);
                println!("     {}", option.outcome);
                println!("     {}", option.scientific_reason);
            }
        }
        StudioTool::Infographic => {
            let url = runtime.block_on(studio.infographic(topic, dimension))?;
            let bytes = data_url_bytes(&url)?;
            println!("Generated image ({} bytes)", bytes.len());
            write_output(output, &bytes)?;
        }
        StudioTool::Audio => {
            let payload = runtime.block_on(studio.audio_overview(topic, dimension))?;
            let samples = decode_pcm16(&payload)?;
            println!(
                "Generated audio: {} samples ({:.1}s at {} Hz)",
                samples.len(),
                samples.len() as f32 / AUDIO_SAMPLE_RATE as f32,
                AUDIO_SAMPLE_RATE
            );
            write_output(output, &STANDARD.decode(payload.trim())?)?;
        }
    }
    Ok(())
}

fn print_quiz(quiz: &[QuizQuestion]) {
    for (i, q) in quiz.iter().enumerate() {
        println!("\nQ{}. {}", i + 1, q.question);
        for (j, option) in q.options.iter().enumerate() {
            let marker = if q.is_correct(j) { "*" } else { " " };
            println!("  {} {}. {}", marker, option_letter(j), option);
        }
        println!("  解析：{}", q.explanation);
    }
}

/// Ask each question on the terminal, then show the score and the key.
fn play_quiz(quiz: &[QuizQuestion]) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut answers = Vec::with_capacity(quiz.len());

    for (i, q) in quiz.iter().enumerate() {
        println!("\nQ{}. {}", i + 1, q.question);
        for (j, option) in q.options.iter().enumerate() {
            println!("    {}. {}", option_letter(j), option);
        }
        let line = editor.readline("你的选择 (A-D)> ")?;
        answers.push(parse_choice(&line, q.options.len()));
    }

    let score = score_quiz(quiz, &answers);
    println!("\n得分：{}/{}", score, quiz.len());
    print_quiz(quiz);
    Ok(())
}

/// Parse an option letter (`A`, `b`) or 1-based number into an index.
fn parse_choice(input: &str, options: usize) -> Option<usize> {
    let input = input.trim();
    let index = match input.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let mut chars = input.chars();
            let c = chars.next()?.to_ascii_uppercase();
            if chars.next().is_some() || !c.is_ascii_uppercase() {
                return None;
            }
            (c as u8 - b'A') as usize
        }
    };
    (index < options).then_some(index)
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, bytes)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

/// Decode the payload of a `data:<mime>;base64,<data>` URL.
fn data_url_bytes(url: &str) -> Result<Vec<u8>> {
    let data = url.split_once(',').map_or(url, |(_, data)| data);
    Ok(STANDARD.decode(data)?)
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Truncate to `max_chars` characters, appending "..." when cut.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
