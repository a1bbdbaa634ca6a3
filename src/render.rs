//! Plain-text rendering of search results

use std::fmt::Write as _;

use crate::offers::{FlightOffer, Itinerary, OfferSet};

/// Formats an offer set as a human-readable summary
pub fn render_offers(offers: &OfferSet) -> String {
    let mut out = String::new();

    if offers.data.is_empty() {
        out.push_str("No flight offers found.\n");
        return out;
    }

    let _ = writeln!(out, "{} offer(s) found", offers.meta.count.max(offers.data.len() as u32));
    for offer in &offers.data {
        out.push('\n');
        render_offer(&mut out, offers, offer);
    }
    out
}

fn render_offer(out: &mut String, offers: &OfferSet, offer: &FlightOffer) {
    let total = offer.price.grand_total.as_deref().unwrap_or(&offer.price.total);
    let _ = write!(out, "Offer {}: {} {}", offer.id, total, offer.price.currency);
    if let Some(seats) = offer.number_of_bookable_seats {
        let _ = write!(out, " ({} seats left)", seats);
    }
    out.push('\n');

    for (i, itinerary) in offer.itineraries.iter().enumerate() {
        let label = match i {
            0 => "Outbound",
            1 => "Return",
            _ => "Leg",
        };
        render_itinerary(out, offers, label, itinerary);
    }
}

fn render_itinerary(out: &mut String, offers: &OfferSet, label: &str, itinerary: &Itinerary) {
    let stops = itinerary.segments.len().saturating_sub(1);
    let _ = writeln!(
        out,
        "  {} {} ({})",
        label,
        format_duration(&itinerary.duration),
        match stops {
            0 => "nonstop".to_string(),
            1 => "1 stop".to_string(),
            n => format!("{} stops", n),
        }
    );

    for segment in &itinerary.segments {
        let _ = writeln!(
            out,
            "    {} {} -> {} {}  {} {}{} ({})",
            segment.departure.iata_code,
            segment.departure.at,
            segment.arrival.iata_code,
            segment.arrival.at,
            offers.carrier_name(&segment.carrier_code),
            segment.carrier_code,
            segment.number,
            offers.aircraft_name(&segment.aircraft.code),
        );
    }
}

/// Turns an ISO-8601 duration like `PT5H30M` into `5h 30m`
///
/// Anything that doesn't look like `PT..H..M` is returned unchanged.
pub fn format_duration(iso: &str) -> String {
    let Some(rest) = iso.strip_prefix("PT") else {
        return iso.to_string();
    };

    let mut parts = Vec::new();
    let mut number = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' => number.push(c),
            'H' | 'M' | 'S' if !number.is_empty() => {
                parts.push(format!("{}{}", number, c.to_ascii_lowercase()));
                number.clear();
            }
            _ => return iso.to_string(),
        }
    }

    if parts.is_empty() || !number.is_empty() {
        iso.to_string()
    } else {
        parts.join(" ")
    }
}
