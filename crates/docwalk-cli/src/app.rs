use docwalk_document::Document;
use docwalk_engine::{
    Action, ActionHost, BrailleDescription, CursorSelection, Granularities, Walker, spoken,
};

/// Output side of the reader: what was performed and what the user still has
/// to choose between.
#[derive(Debug, Default)]
pub struct ActionLog {
    pub messages: Vec<String>,
    pub choices: Vec<Action>,
}

impl ActionHost for ActionLog {
    fn perform(&mut self, action: Action) {
        log::info!("performing {action:?}");
        self.messages.push(action.label());
        self.choices.clear();
    }

    fn disambiguate(&mut self, actions: Vec<Action>) {
        let menu = actions
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{}: {}", i + 1, a.label()))
            .collect::<Vec<_>>()
            .join(", ");
        self.messages.push(format!("Choose an action. {menu}"));
        self.choices = actions;
    }
}

/// Navigation state of the interactive reader.
pub struct App {
    doc: Document,
    granularities: Granularities,
    current: usize,
    selection: Option<CursorSelection>,
    wrap: bool,
    pub spoken: String,
    pub braille: BrailleDescription,
    pub actions: ActionLog,
}

impl App {
    pub fn new(doc: Document, granularities: Granularities, current: usize, wrap: bool) -> Self {
        let mut app = Self {
            doc,
            granularities,
            current,
            selection: None,
            wrap,
            spoken: String::new(),
            braille: BrailleDescription::default(),
            actions: ActionLog::default(),
        };
        app.jump_to_edge(false);
        app
    }

    fn walker(&self) -> &dyn Walker {
        self.granularities.cycled(self.current)
    }

    pub fn granularity_label(&self) -> &'static str {
        self.walker().granularity_label()
    }

    pub fn selection(&self) -> Option<CursorSelection> {
        self.selection
    }

    /// Speak and show the move from `prev` to `sel`, and make `sel` current.
    fn announce(&mut self, prev: CursorSelection, sel: CursorSelection) {
        let walker = self.walker();
        let line = spoken(&walker.description(&self.doc, prev, sel));
        let braille = walker.braille(&self.doc, prev, sel);
        self.spoken = line;
        self.braille = braille;
        self.selection = Some(sel);
    }

    fn no_position(&mut self) {
        self.spoken = format!("No {} positions", self.granularity_label());
        self.braille = BrailleDescription::default();
        self.selection = None;
    }

    /// Go to the first position, or the last one when `reversed`.
    fn jump_to_edge(&mut self, reversed: bool) -> bool {
        let Ok(prev) = CursorSelection::from_document_start(&self.doc, reversed) else {
            self.spoken = "Empty document".to_string();
            self.braille = BrailleDescription::default();
            self.selection = None;
            return false;
        };
        match self.walker().sync(&self.doc, prev) {
            Some(sel) => {
                self.announce(prev, sel);
                true
            }
            None => {
                self.no_position();
                false
            }
        }
    }

    /// Move one position forward, or backward when `reversed`.
    pub fn step(&mut self, reversed: bool) -> bool {
        let Some(current) = self.selection else {
            return self.jump_to_edge(reversed);
        };
        let current = current.with_reversed(reversed);
        match self.walker().next(&self.doc, current) {
            Some(next) => {
                self.announce(current, next);
                true
            }
            None if self.wrap => {
                log::debug!("wrapping around at {}", self.granularity_label());
                self.jump_to_edge(reversed)
            }
            None => {
                self.spoken = if reversed {
                    "Start of document".to_string()
                } else {
                    "End of document".to_string()
                };
                false
            }
        }
    }

    /// Switch to the next granularity (previous when `backwards`) and sync
    /// the current position to it.
    pub fn cycle_granularity(&mut self, backwards: bool) {
        self.current = self.granularities.cycle(self.current, backwards);
        let Some(prev) = self.selection else {
            self.jump_to_edge(false);
            return;
        };
        let walker = self.walker();
        let synced = walker
            .sync(&self.doc, prev)
            .or_else(|| walker.sync(&self.doc, prev.with_reversed(!prev.is_reversed())));
        match synced {
            Some(sel) => self.announce(prev, sel),
            None => self.no_position(),
        }
        self.spoken = format!("{}. {}", self.granularity_label(), self.spoken);
    }

    /// Act on the current position.
    pub fn activate(&mut self) {
        let Some(sel) = self.selection else {
            return;
        };
        let walker = self.granularities.cycled(self.current);
        if !walker.act(&self.doc, sel, &mut self.actions) {
            self.actions.messages.push("No action here".to_string());
        }
    }

    /// Pick one of the actions offered by the last disambiguation.
    pub fn choose(&mut self, number: usize) {
        if number == 0 || number > self.actions.choices.len() {
            return;
        }
        let action = self.actions.choices.remove(number - 1);
        self.actions.perform(action);
    }
}
