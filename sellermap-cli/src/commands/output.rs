//! Terminal output for seller lists and map snapshots.

use console::style;
use sellermap::entity::{Entity, PresenceStatus};
use sellermap::orchestrator::MapSnapshot;

/// Format one seller as a table row.
pub fn seller_row(entity: &Entity) -> String {
    let position = match entity.location {
        Some(point) => format!("{:>10.5} {:>11.5}", point.latitude, point.longitude),
        None => format!("{:>10} {:>11}", "-", "-"),
    };
    let rating = entity
        .rating_avg
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>6}  {:<20} {:>4}  {:<9}  {}",
        entity.id,
        truncate(&entity.username, 20),
        rating,
        entity.presence_status.as_str(),
        position
    )
}

/// Print a seller table with a header and summary line.
pub fn print_sellers(sellers: &[Entity]) {
    println!(
        "{}",
        style(format!(
            "{:>6}  {:<20} {:>4}  {:<9}  {:>10} {:>11}",
            "ID", "SELLER", "RATE", "STATUS", "LAT", "LON"
        ))
        .bold()
    );

    for seller in sellers {
        let row = seller_row(seller);
        match seller.presence_status {
            PresenceStatus::Online => println!("{}", style(row).green()),
            PresenceStatus::Streaming => println!("{}", style(row).cyan()),
            PresenceStatus::Offline => println!("{}", style(row).dim()),
        }
    }

    let placed = sellers.iter().filter(|s| s.is_renderable()).count();
    println!();
    println!("{} sellers ({} with a position)", sellers.len(), placed);
}

/// One-line summary of a snapshot.
pub fn snapshot_line(snapshot: &MapSnapshot) -> String {
    let viewport = snapshot
        .viewport
        .map(|vp| vp.to_string())
        .unwrap_or_else(|| "-".to_string());
    let updated = snapshot
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "[{}] {} markers / {} sellers, viewport {}, updated {}",
        snapshot.phase,
        snapshot.marker_count(),
        snapshot.entity_count(),
        viewport,
        updated
    )
}

/// Print a snapshot; the marker list is only printed when it changed.
pub fn print_snapshot(snapshot: &MapSnapshot, entities_changed: bool) {
    if !entities_changed {
        println!("{}", style(snapshot_line(snapshot)).dim());
        return;
    }

    println!("{}", style(snapshot_line(snapshot)).bold());
    for marker in snapshot.markers() {
        println!("  {}", seller_row(marker));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sellermap::geo::GeoPoint;
    use std::sync::Arc;

    fn seller(id: u64, location: Option<GeoPoint>) -> Entity {
        Entity {
            id,
            user_id: id,
            username: "corner-bakery".to_string(),
            rating_avg: Some(4.25),
            presence_status: PresenceStatus::Online,
            location,
        }
    }

    #[test]
    fn test_row_without_location() {
        let row = seller_row(&seller(3, None));
        assert!(row.contains("corner-bakery"));
        assert!(row.contains("online"));
        assert!(row.trim_end().ends_with('-'));
    }

    #[test]
    fn test_row_with_location() {
        let point = GeoPoint::new(37.78825, -122.4324).unwrap();
        let row = seller_row(&seller(3, Some(point)));
        assert!(row.contains("37.78825"));
        assert!(row.contains("-122.43240"));
    }

    #[test]
    fn test_row_unrated() {
        let mut unrated = seller(4, None);
        unrated.rating_avg = None;
        let row = seller_row(&unrated);
        assert!(row.contains("corner-bakery           -  online"), "{}", row);
    }

    #[test]
    fn test_truncate_long_name() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn test_snapshot_line_counts() {
        let point = GeoPoint::new(1.0, 1.0).unwrap();
        let snapshot = MapSnapshot {
            entities: Arc::new(vec![seller(1, Some(point)), seller(2, None)]),
            ..MapSnapshot::default()
        };
        let line = snapshot_line(&snapshot);
        assert!(line.contains("1 markers / 2 sellers"));
        assert!(line.contains("updated never"));
    }
}
