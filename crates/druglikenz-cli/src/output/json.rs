use druglikenz_core::error::DruglikenzError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), DruglikenzError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
