use crate::controller::AppCommand;
use crate::selection::FilterField;

pub const HELP: &str = "\
commands:
  building <name>    set the building filter
  floor <name>       set the floor filter
  station <name>     set the station filter
  cell <name>        pick a storage cell
  add                create a chart for the current selection
  remove <n>         delete chart n
  clear              delete every chart
  toggle <n>         expand or collapse chart n
  move <from> <to>   reorder the chart list
  resize             signal a viewport resize
  reload             refetch the chart list
  help               show this text
  quit               exit";

#[derive(Debug)]
pub enum ShellAction {
    Command(AppCommand),
    Help,
    Empty,
    Unknown(String),
}

/// Map one shell line to a command.
pub fn parse(line: &str) -> ShellAction {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return ShellAction::Empty;
    };
    let rest: Vec<&str> = parts.collect();

    let filter = |field: FilterField, rest: &[&str]| {
        if rest.is_empty() {
            ShellAction::Unknown(format!("'{word}' needs a value"))
        } else {
            ShellAction::Command(AppCommand::SetFilter {
                field,
                value: rest.join(" "),
            })
        }
    };

    match word {
        "building" => filter(FilterField::Building, &rest),
        "floor" => filter(FilterField::Floor, &rest),
        "station" => filter(FilterField::Station, &rest),
        "cell" => filter(FilterField::StorageCell, &rest),
        "add" => ShellAction::Command(AppCommand::AddChart),
        "remove" => match rest.first().and_then(|s| s.parse().ok()) {
            Some(index) => ShellAction::Command(AppCommand::RemoveChart(index)),
            None => ShellAction::Unknown("'remove' needs a chart index".into()),
        },
        "clear" => ShellAction::Command(AppCommand::ClearCharts),
        "toggle" => match rest.first().and_then(|s| s.parse().ok()) {
            Some(index) => ShellAction::Command(AppCommand::ToggleExpanded(index)),
            None => ShellAction::Unknown("'toggle' needs a chart index".into()),
        },
        "move" => {
            let from = rest.first().and_then(|s| s.parse().ok());
            let to = rest.get(1).and_then(|s| s.parse().ok());
            match (from, to) {
                (Some(from), Some(to)) => {
                    ShellAction::Command(AppCommand::MoveChart { from, to })
                }
                _ => ShellAction::Unknown("'move' needs two indices".into()),
            }
        }
        "resize" => ShellAction::Command(AppCommand::ViewportResized),
        "reload" => ShellAction::Command(AppCommand::Reload),
        "help" => ShellAction::Help,
        "quit" | "exit" => ShellAction::Command(AppCommand::Quit),
        other => ShellAction::Unknown(format!("unknown command '{other}'")),
    }
}
