use crate::definition::ScenarioDefinition;

/// Which scenarios a run should activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every enabled scenario, in registration order.
    All,
    /// Exactly these names, in this order. Disabled scenarios are fair game
    /// here; naming one explicitly is the way to debug it.
    Names(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
}

/// The ordered collection of every scenario definition the binary knows.
///
/// Registration order is meaningful: it is the execution order of an "all"
/// run. Entries sharing a name (differing versions of one scenario) stay
/// distinct and are never merged.
#[derive(Debug, Default)]
pub struct ScenarioRegistry {
    entries: Vec<ScenarioDefinition>,
}

impl ScenarioRegistry {
    pub fn register(&mut self, definition: ScenarioDefinition) {
        self.entries.push(definition);
    }

    pub fn register_all(&mut self, definitions: impl IntoIterator<Item = ScenarioDefinition>) {
        self.entries.extend(definitions);
    }

    pub fn entries(&self) -> &[ScenarioDefinition] {
        &self.entries
    }

    pub fn select(&self, selection: &Selection) -> Result<Vec<&ScenarioDefinition>, SelectionError> {
        match selection {
            Selection::All => Ok(self
                .entries
                .iter()
                .filter(|definition| definition.enabled())
                .collect()),
            Selection::Names(names) => {
                let mut selected = Vec::new();
                for name in names {
                    let matches: Vec<&ScenarioDefinition> = self
                        .entries
                        .iter()
                        .filter(|definition| definition.name() == name)
                        .collect();
                    if matches.is_empty() {
                        return Err(SelectionError::UnknownScenario(name.clone()));
                    }
                    selected.extend(matches);
                }
                Ok(selected)
            }
        }
    }
}
