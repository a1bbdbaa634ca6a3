//! Static catalog of selectable airports and currencies
//!
//! The search command only offers codes listed here. The core search flow does
//! not consult the catalog; it is the selection layer's job to reject codes the
//! provider wouldn't recognise.

/// An airport that can be picked as origin or destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Airport {
    /// IATA airport code
    pub code: &'static str,
    /// Human-readable airport name
    pub name: &'static str,
}

/// Static array of selectable airports
pub static AIRPORTS: [Airport; 10] = [
    Airport {
        code: "ATL",
        name: "Hartsfield-Jackson Atlanta International Airport",
    },
    Airport {
        code: "DEN",
        name: "Denver International Airport",
    },
    Airport {
        code: "DFW",
        name: "Dallas Fort Worth International Airport",
    },
    Airport {
        code: "JFK",
        name: "John F. Kennedy International Airport",
    },
    Airport {
        code: "LAX",
        name: "Los Angeles International Airport",
    },
    Airport {
        code: "MIA",
        name: "Miami International Airport",
    },
    Airport {
        code: "ORD",
        name: "O'Hare International Airport",
    },
    Airport {
        code: "SEA",
        name: "Seattle-Tacoma International Airport",
    },
    Airport {
        code: "SFO",
        name: "San Francisco International Airport",
    },
    Airport {
        code: "YVR",
        name: "Vancouver International Airport",
    },
];

/// Currencies prices can be quoted in
pub static CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// Returns all selectable airports
pub fn all_airports() -> &'static [Airport] {
    &AIRPORTS
}

/// Get an airport by its IATA code, ignoring case
///
/// # Example
///
/// ```
/// use flightsearch::catalog::get_airport_by_code;
///
/// if let Some(airport) = get_airport_by_code("jfk") {
///     println!("Found: {}", airport.name);
/// }
/// ```
pub fn get_airport_by_code(code: &str) -> Option<&'static Airport> {
    let code = code.trim();
    AIRPORTS
        .iter()
        .find(|airport| airport.code.eq_ignore_ascii_case(code))
}

/// True if prices can be requested in this currency, ignoring case
pub fn is_supported_currency(code: &str) -> bool {
    let code = code.trim();
    CURRENCIES.iter().any(|c| c.eq_ignore_ascii_case(code))
}
