// 📝 Entry Form - validation, duplicate check and the dialog state machine
// Pure logic: nothing here touches the terminal. The UI reacts to the
// returned outcomes (alerts, closing the dialog, refreshing the table).

use crate::error::{FormError, FormErrors};
use crate::persona::Persona;
use crate::store::PersonaStore;
use std::fmt;
use tracing::{debug, info, warn};

// ============================================================================
// FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Nombre,
    Apellido,
    Edad,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Nombre, Field::Apellido, Field::Edad];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Nombre => "Nombre",
            Field::Apellido => "Apellido",
            Field::Edad => "Edad",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Field::Nombre => Field::Apellido,
            Field::Apellido => Field::Edad,
            Field::Edad => Field::Nombre,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::Nombre => Field::Edad,
            Field::Apellido => Field::Nombre,
            Field::Edad => Field::Apellido,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// VALIDATION & SUBMISSION
// ============================================================================

pub type ValidationResult = Result<Persona, FormErrors>;

/// Validate the three raw inputs and build a candidate.
///
/// Errors are collected in field order rather than stopping at the first one.
/// Text is taken as typed: only an empty field is missing, and surrounding
/// whitespace is kept (so `" 30"` is not a number).
pub fn validate(nombre_text: &str, apellido_text: &str, edad_text: &str) -> ValidationResult {
    let mut errors = FormErrors::new();

    if nombre_text.is_empty() {
        errors.push(FormError::MissingField(Field::Nombre));
    }

    if apellido_text.is_empty() {
        errors.push(FormError::MissingField(Field::Apellido));
    }

    let edad = if edad_text.is_empty() {
        errors.push(FormError::MissingField(Field::Edad));
        None
    } else {
        match edad_text.parse::<i32>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FormError::InvalidNumber(Field::Edad));
                None
            }
        }
    };

    match edad {
        Some(edad) if errors.is_empty() => Ok(Persona::new(nombre_text, apellido_text, edad)),
        _ => Err(errors),
    }
}

/// Append `candidate` unless an equal row already exists
pub fn submit(candidate: Persona, store: &PersonaStore) -> Result<(), FormError> {
    if store.contains(&candidate) {
        return Err(FormError::DuplicateRecord);
    }
    store.append(candidate);
    Ok(())
}

/// Replace the row at `index`; only *other* rows count as duplicates
pub fn submit_edit(
    index: usize,
    candidate: Persona,
    store: &PersonaStore,
) -> Result<(), FormError> {
    if index >= store.len() {
        return Err(FormError::RowNotFound(index));
    }

    let clash = store
        .get_all()
        .iter()
        .enumerate()
        .any(|(i, p)| i != index && *p == candidate);
    if clash {
        return Err(FormError::DuplicateRecord);
    }

    store
        .replace(index, candidate)
        .map(|_| ())
        .ok_or(FormError::RowNotFound(index))
}

// ============================================================================
// DIALOG STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { index: usize },
}

impl FormMode {
    pub fn title(&self) -> &str {
        match self {
            FormMode::Add => "Nueva Persona",
            FormMode::Edit { .. } => "Editar Persona",
        }
    }
}

/// Construction is the `Open` step; `Validating` only holds inside `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Validating,
    Saved,
    Cancelled,
}

impl DialogState {
    pub fn is_closed(&self) -> bool {
        matches!(self, DialogState::Saved | DialogState::Cancelled)
    }
}

/// What a save attempt produced; the caller decides how to present it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Persona),
    Invalid(FormErrors),
    Duplicate,
    Rejected(FormError),
    /// Dialog already closed, nothing happened
    Ignored,
}

impl SaveOutcome {
    /// Text for the error alert, if this outcome needs one
    pub fn alert_message(&self) -> Option<String> {
        match self {
            SaveOutcome::Invalid(errors) => Some(errors.to_string()),
            SaveOutcome::Duplicate => Some(FormError::DuplicateRecord.to_string()),
            SaveOutcome::Rejected(error) => Some(error.to_string()),
            SaveOutcome::Saved(_) | SaveOutcome::Ignored => None,
        }
    }
}

/// One modal invocation: three text inputs plus where the result goes.
///
/// Holds a handle to the shared store, handed over at construction.
#[derive(Debug)]
pub struct EntryForm {
    mode: FormMode,
    state: DialogState,
    focus: Field,
    nombre: String,
    apellido: String,
    edad: String,
    store: PersonaStore,
}

impl EntryForm {
    pub fn new_add(store: PersonaStore) -> Self {
        debug!("entry form opened for a new persona");
        EntryForm {
            mode: FormMode::Add,
            state: DialogState::Editing,
            focus: Field::Nombre,
            nombre: String::new(),
            apellido: String::new(),
            edad: String::new(),
            store,
        }
    }

    /// Prefilled from row `index`; `None` if the row does not exist
    pub fn new_edit(store: PersonaStore, index: usize) -> Option<Self> {
        let persona = store.get(index)?;
        debug!(index, persona = %persona, "entry form opened for edit");
        Some(EntryForm {
            mode: FormMode::Edit { index },
            state: DialogState::Editing,
            focus: Field::Nombre,
            nombre: persona.nombre,
            apellido: persona.apellido,
            edad: persona.edad.to_string(),
            store,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Nombre => &self.nombre,
            Field::Apellido => &self.apellido,
            Field::Edad => &self.edad,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Nombre => &mut self.nombre,
            Field::Apellido => &mut self.apellido,
            Field::Edad => &mut self.edad,
        }
    }

    pub fn set_value(&mut self, field: Field, text: &str) {
        if self.state == DialogState::Editing {
            *self.value_mut(field) = text.to_string();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.state == DialogState::Editing {
            let field = self.focus;
            self.value_mut(field).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.state == DialogState::Editing {
            let field = self.focus;
            self.value_mut(field).pop();
        }
    }

    pub fn clear_fields(&mut self) {
        self.nombre.clear();
        self.apellido.clear();
        self.edad.clear();
        self.focus = Field::Nombre;
    }

    /// Run validation, the duplicate check and the store mutation
    pub fn save(&mut self) -> SaveOutcome {
        if self.state != DialogState::Editing {
            return SaveOutcome::Ignored;
        }
        self.state = DialogState::Validating;

        let candidate = match validate(&self.nombre, &self.apellido, &self.edad) {
            Ok(candidate) => candidate,
            Err(errors) => {
                warn!(errors = errors.len(), "save rejected by validation");
                self.state = DialogState::Editing;
                return SaveOutcome::Invalid(errors);
            }
        };

        let result = match self.mode {
            FormMode::Add => submit(candidate.clone(), &self.store),
            FormMode::Edit { index } => submit_edit(index, candidate.clone(), &self.store),
        };

        match result {
            Ok(()) => {
                info!(persona = %candidate, mode = self.mode.title(), "persona saved");
                self.clear_fields();
                self.state = DialogState::Saved;
                SaveOutcome::Saved(candidate)
            }
            Err(FormError::DuplicateRecord) => {
                warn!(persona = %candidate, "duplicate persona rejected");
                self.clear_fields();
                self.state = DialogState::Editing;
                SaveOutcome::Duplicate
            }
            Err(error) => {
                warn!(%error, "save rejected");
                self.state = DialogState::Editing;
                SaveOutcome::Rejected(error)
            }
        }
    }

    pub fn cancel(&mut self) {
        if !self.state.is_closed() {
            debug!("entry form cancelled");
            self.state = DialogState::Cancelled;
        }
    }
}
