use crate::map::MetroMap;
use crate::navigate::{Itinerary, NavigateOutcome, NavigationRecord};

/// Render a navigation outcome for terminal or chat display.
///
/// Degenerate outcomes become one-line notices; a journey is rendered by
/// [`render_itinerary`].
pub fn render_outcome(outcome: &NavigateOutcome) -> String {
    match outcome {
        NavigateOutcome::Itinerary(itinerary) => render_itinerary(itinerary),
        NavigateOutcome::TooClose => "当前位置距离目的地过近".to_string(),
        NavigateOutcome::TooFar => "位置距离地铁系统过远".to_string(),
        NavigateOutcome::NoItinerary | NavigateOutcome::NoRoute { .. } => {
            "暂无地铁乘坐方案".to_string()
        }
    }
}

/// Render a journey as newline-joined blocks: a header, the walking
/// access, one block per ride with any transfer folded into its tail, the
/// walking egress, and a distance summary.
///
/// Ride and access blocks end in a newline of their own, so the join
/// leaves a blank line after them; the egress and summary do not.
pub fn render_itinerary(itinerary: &Itinerary) -> String {
    let mut blocks = vec!["路线为：".to_string()];
    let records = &itinerary.records;
    for (index, record) in records.iter().enumerate() {
        match record {
            NavigationRecord::Enter {
                station,
                walk_distance,
            } => {
                if *walk_distance > 0.0 {
                    blocks.push(format!(
                        "当前位置\n↓步行{walk_distance:.2}米\n{station}地铁站 进站\n"
                    ));
                } else {
                    blocks.push(format!("{station} 地铁站 进站\n"));
                }
            }
            NavigationRecord::Ride {
                line,
                direction,
                stops,
                from,
                to,
            } => {
                let change = match records.get(index + 1) {
                    Some(NavigationRecord::Transfer { to_line, .. }) => Some(to_line),
                    _ => None,
                };
                match change {
                    Some(next_line) => blocks.push(format!(
                        "{from} 地铁站 \n↓ {line} {direction} 方向 乘坐 {stops} 站\n{to} 地铁站 换乘 {next_line}\n"
                    )),
                    None => blocks.push(format!(
                        "{from} 地铁站 \n↓ {line} {direction} 方向 乘坐 {stops} 站\n{to} 地铁站\n"
                    )),
                }
            }
            // Shown inside the preceding ride block.
            NavigationRecord::Transfer { .. } => {}
            NavigationRecord::Exit {
                station,
                walk_distance,
            } => {
                if *walk_distance > 0.0 {
                    blocks.push(format!(
                        "由 {station} 地铁站出站\n↓步行 {walk_distance:.2} 米\n目的地"
                    ));
                } else {
                    blocks.push(format!("由 {station} 地铁站出站"));
                }
            }
        }
    }
    if itinerary.walk_distance > 0.0 {
        blocks.push(format!(
            "总计步行距离约 {:.2} 米，乘车约 {:.0} 米。",
            itinerary.walk_distance, itinerary.ride_distance
        ));
    } else {
        blocks.push(format!("总计乘车约 {:.0} 米。", itinerary.ride_distance));
    }
    blocks.join("\n")
}

/// Station names grouped by service status, enabled first. The disabled
/// group is omitted entirely when every station is in service.
pub fn render_station_list(map: &MetroMap) -> String {
    let (enabled, disabled) = map.stations_by_status();
    let join = |stations: &[&crate::map::Station]| {
        stations
            .iter()
            .map(|station| station.name.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut lines = vec!["已启用的地铁站如下:".to_string(), join(&enabled)];
    if !disabled.is_empty() {
        lines.push("未启用的地铁站:".to_string());
        lines.push(join(&disabled));
    }
    lines.join("\n")
}
