//! Preview command - render a flow document's screens in the terminal.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use console::Style;

use whatsflow_flow::{ActionKind, FlowDocument, InputKind, SelectOption};
use whatsflow_renderer::{FooterButton, RenderedScreen, ScreenAnswers, Widget, render_screen};
use whatsflow_types::ScreenId;

use super::Context;

/// Arguments for the preview command.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Flow document to preview
    pub file: PathBuf,

    /// Render only this screen
    #[arg(short, long)]
    pub screen: Option<String>,
}

/// Run the preview command.
pub fn run(args: PreviewArgs, ctx: &Context) -> Result<()> {
    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let doc = FlowDocument::from_json(&json)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    // Blank previews: no form state entered yet
    let answers = ScreenAnswers::new();

    match args.screen {
        Some(id) => {
            let screen_id = ScreenId::from(id);
            let screen = match doc.screen(&screen_id) {
                Some(screen) => screen,
                None => bail!(
                    "screen '{}' does not exist in {}",
                    screen_id,
                    args.file.display()
                ),
            };
            let rendered = render_screen(&doc, screen, &answers);
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                print_screen(&rendered);
            }
        }
        None => {
            let rendered: Vec<RenderedScreen> = doc
                .screens
                .iter()
                .map(|screen| render_screen(&doc, screen, &answers))
                .collect();
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                for (index, screen) in rendered.iter().enumerate() {
                    if index > 0 {
                        println!();
                    }
                    print_screen(screen);
                }
            }
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal rendering
// ─────────────────────────────────────────────────────────────────────────────

fn print_screen(rendered: &RenderedScreen) {
    let title_style = Style::new().cyan().bold();
    let dim = Style::new().dim();

    let header = format!("[{}] {}", rendered.id, rendered.title);
    if rendered.terminal {
        println!(
            "{} {}",
            title_style.apply_to(header),
            dim.apply_to("(terminal)")
        );
    } else {
        println!("{}", title_style.apply_to(header));
    }
    println!("{}", dim.apply_to("─".repeat(40)));

    for widget in &rendered.widgets {
        print_widget(widget);
    }

    print_footer(&rendered.footer);
}

fn print_widget(widget: &Widget) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();

    match widget {
        Widget::Heading { text } | Widget::Subheading { text } => {
            println!("  {}", bold.apply_to(text));
        }
        Widget::Body { text, .. } => println!("  {}", text),
        Widget::Caption { text } | Widget::RichText { text } => {
            println!("  {}", dim.apply_to(text));
        }
        Widget::TextField {
            name,
            label,
            kind,
            required,
            helper_text,
            value,
            ..
        } => {
            let mut line = format!(
                "  {}: {}",
                field_label(label, name, *required),
                value.as_deref().unwrap_or("____")
            );
            if !matches!(kind, InputKind::Text) {
                line.push_str(&format!(" {}", dim.apply_to(format!("({})", kind.as_str()))));
            }
            println!("{}", line);
            if let Some(helper) = helper_text {
                println!("    {}", dim.apply_to(helper));
            }
        }
        Widget::TextArea {
            name,
            label,
            required,
            helper_text,
            value,
        } => {
            println!(
                "  {}: {}",
                field_label(label, name, *required),
                value.as_deref().unwrap_or("________")
            );
            if let Some(helper) = helper_text {
                println!("    {}", dim.apply_to(helper));
            }
        }
        Widget::CheckboxGroup {
            name,
            label,
            description,
            required,
            options,
            selected,
            ..
        } => {
            println!("  {}:", field_label(label, name, *required));
            if let Some(description) = description {
                println!("    {}", dim.apply_to(description));
            }
            for option in options {
                let mark = if selected.contains(&option.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                println!("    {} {}", mark, option_title(option));
            }
        }
        Widget::RadioGroup {
            name,
            label,
            description,
            required,
            options,
            selected,
            ..
        } => {
            println!("  {}:", field_label(label, name, *required));
            if let Some(description) = description {
                println!("    {}", dim.apply_to(description));
            }
            for option in options {
                let mark = if selected.as_deref() == Some(option.id.as_str()) {
                    "(•)"
                } else {
                    "( )"
                };
                println!("    {} {}", mark, option_title(option));
            }
        }
        Widget::Dropdown {
            name,
            label,
            required,
            options,
            selected,
            ..
        } => {
            let current = selected
                .as_ref()
                .and_then(|id| options.iter().find(|option| &option.id == id))
                .map(|option| option.title.as_str())
                .unwrap_or("select");
            println!("  {}: [{} ▾]", field_label(label, name, *required), current);
            for option in options {
                println!("    {}", dim.apply_to(format!("- {}", option.title)));
            }
        }
        Widget::ChipSelector {
            name,
            label,
            description,
            max_selected,
            options,
            selected,
            ..
        } => {
            let mut heading = field_label(label, name, false);
            if let Some(max) = max_selected {
                heading.push_str(&format!(" (up to {})", max));
            }
            println!("  {}:", heading);
            if let Some(description) = description {
                println!("    {}", dim.apply_to(description));
            }
            let chips: Vec<String> = options
                .iter()
                .map(|option| {
                    if selected.contains(&option.id) {
                        format!("[{} ✓]", option.title)
                    } else {
                        format!("[{}]", option.title)
                    }
                })
                .collect();
            println!("    {}", chips.join(" "));
        }
        Widget::DateField {
            name,
            label,
            helper_text,
            value,
            ..
        } => {
            println!(
                "  {}: {}",
                field_label(label, name, false),
                value.as_deref().unwrap_or("____-__-__")
            );
            if let Some(helper) = helper_text {
                println!("    {}", dim.apply_to(helper));
            }
        }
        Widget::OptIn {
            name,
            label,
            required,
            accepted,
            ..
        } => {
            let mark = if *accepted { "[x]" } else { "[ ]" };
            println!("  {} {}", mark, field_label(label, name, *required));
        }
        Widget::Link { text, .. } => {
            println!("  {}", Style::new().cyan().underlined().apply_to(text));
        }
        Widget::NavList { rows, .. } => {
            for row in rows {
                let mut line = format!("  {}", row.title);
                if let Some(metadata) = &row.metadata {
                    line.push_str(&format!(" {}", dim.apply_to(format!("({})", metadata))));
                }
                if let Some(end_title) = &row.end_title {
                    line.push_str(&format!("  {}", end_title));
                }
                line.push_str(&format!(" {}", dim.apply_to("›")));
                println!("{}", line);
                if let Some(end_description) = &row.end_description {
                    println!("    {}", dim.apply_to(end_description));
                }
            }
        }
    }
}

fn print_footer(footer: &FooterButton) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();

    let note = match footer.action.name {
        ActionKind::Complete => Some("completes the flow".to_string()),
        ActionKind::Navigate => footer
            .action
            .navigate_target()
            .map(|target| format!("next: {}", target)),
        _ => None,
    };

    match note {
        Some(note) => println!(
            "  {} {}",
            bold.apply_to(format!("[ {} ]", footer.label)),
            dim.apply_to(format!("({})", note))
        ),
        None => println!("  {}", bold.apply_to(format!("[ {} ]", footer.label))),
    }
}

fn field_label(label: &Option<String>, name: &str, required: bool) -> String {
    let base = label.as_deref().unwrap_or(name);
    if required {
        format!("{}*", base)
    } else {
        base.to_string()
    }
}

fn option_title(option: &SelectOption) -> String {
    let dim = Style::new().dim();
    match &option.description {
        Some(description) => format!(
            "{} {}",
            option.title,
            dim.apply_to(format!("({})", description))
        ),
        None => option.title.clone(),
    }
}
