// Entity Models
//
// - Pensioner: identity-keyed record owned by the pensioner-detail service
// - Bank: the one account a pension is paid into

pub mod bank;
pub mod pensioner;

pub use bank::{Bank, BankType};
pub use pensioner::{
    PensionAmountDetail, PensionResult, PensionType, PensionerDetail, PensionerInput,
};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
