// 👤 Persona - the record shown in the table
// Plain value type: equality is structural across all three fields

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Persona {
    pub nombre: String,
    pub apellido: String,
    pub edad: i32,
}

impl Persona {
    pub fn new(nombre: impl Into<String>, apellido: impl Into<String>, edad: i32) -> Self {
        Persona {
            nombre: nombre.into(),
            apellido: apellido.into(),
            edad,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.nombre, self.apellido, self.edad)
    }
}
