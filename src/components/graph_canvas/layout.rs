use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::str::FromStr;

/// Geometric arrangement applied when the graph is (re)built. The names
/// mirror the layout options exposed in the UI and the URL segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutKind {
	#[default]
	Grid,
	Cose,
	Breadthfirst,
	Concentric,
	Circle,
}

impl LayoutKind {
	pub const ALL: [LayoutKind; 5] = [
		LayoutKind::Grid,
		LayoutKind::Cose,
		LayoutKind::Breadthfirst,
		LayoutKind::Concentric,
		LayoutKind::Circle,
	];

	/// URL segment / option value.
	pub fn as_str(self) -> &'static str {
		match self {
			LayoutKind::Grid => "grid",
			LayoutKind::Cose => "cose",
			LayoutKind::Breadthfirst => "breadthfirst",
			LayoutKind::Concentric => "concentric",
			LayoutKind::Circle => "circle",
		}
	}

	/// Human-readable option label.
	pub fn label(self) -> &'static str {
		match self {
			LayoutKind::Grid => "Grid",
			LayoutKind::Cose => "Cose",
			LayoutKind::Breadthfirst => "Breadthfirst",
			LayoutKind::Concentric => "Concentric",
			LayoutKind::Circle => "Circle",
		}
	}

	/// Static layouts pin nodes where the layout put them; `Cose` hands them
	/// to the force simulation instead.
	pub fn is_anchored(self) -> bool {
		!matches!(self, LayoutKind::Cose)
	}
}

impl FromStr for LayoutKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		LayoutKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or(())
	}
}

/// Compute an initial position for every node, indexed like `radii`.
/// `edges` are index pairs and only matter for the breadth-first layout.
pub fn positions(
	kind: LayoutKind,
	radii: &[f64],
	edges: &[(usize, usize)],
	width: f64,
	height: f64,
) -> Vec<(f64, f64)> {
	if radii.is_empty() {
		return Vec::new();
	}
	let (cx, cy) = (width / 2.0, height / 2.0);
	match kind {
		LayoutKind::Grid => grid(radii, cx, cy),
		// Cose starts from the same ring the circle layout uses and lets the
		// simulation spread it out.
		LayoutKind::Circle | LayoutKind::Cose => circle(radii, cx, cy),
		LayoutKind::Concentric => concentric(radii, cx, cy),
		LayoutKind::Breadthfirst => breadthfirst(radii, edges, cx),
	}
}

fn max_diameter(radii: &[f64]) -> f64 {
	radii.iter().fold(0.0f64, |acc, r| acc.max(*r)) * 2.0
}

fn grid(radii: &[f64], cx: f64, cy: f64) -> Vec<(f64, f64)> {
	let n = radii.len();
	let cell = max_diameter(radii) + 40.0;
	let cols = (n as f64).sqrt().ceil() as usize;
	(0..n)
		.map(|i| {
			let (col, row) = (i % cols, i / cols);
			(
				cx + (col as f64 - (cols as f64 - 1.0) / 2.0) * cell,
				cy + (row as f64 - ((n - 1) / cols) as f64 / 2.0) * cell,
			)
		})
		.collect()
}

fn circle(radii: &[f64], cx: f64, cy: f64) -> Vec<(f64, f64)> {
	let n = radii.len();
	// Ring sized so all nodes fit along the circumference.
	let ring = ((max_diameter(radii) + 30.0) * n as f64 / TAU).max(120.0);
	(0..n)
		.map(|i| {
			let angle = i as f64 / n as f64 * TAU;
			(cx + ring * angle.cos(), cy + ring * angle.sin())
		})
		.collect()
}

/// Biggest nodes innermost, growing outward ring by ring.
fn concentric(radii: &[f64], cx: f64, cy: f64) -> Vec<(f64, f64)> {
	let n = radii.len();
	let mut order: Vec<usize> = (0..n).collect();
	order.sort_by(|&a, &b| radii[b].total_cmp(&radii[a]));

	let gap = max_diameter(radii) + 50.0;
	let spacing = max_diameter(radii) + 30.0;
	let mut out = vec![(0.0, 0.0); n];
	let mut placed = 0usize;
	let mut ring = 0usize;
	while placed < n {
		if ring == 0 {
			out[order[placed]] = (cx, cy);
			placed += 1;
		} else {
			let ring_r = ring as f64 * gap;
			let capacity = ((TAU * ring_r / spacing) as usize).max(6).min(n - placed);
			for slot in 0..capacity {
				let angle = slot as f64 / capacity as f64 * TAU;
				out[order[placed]] = (cx + ring_r * angle.cos(), cy + ring_r * angle.sin());
				placed += 1;
			}
		}
		ring += 1;
	}
	out
}

/// Level order from a breadth-first walk rooted at the highest-degree node;
/// disconnected remainders start over from level zero.
fn breadthfirst(radii: &[f64], edges: &[(usize, usize)], cx: f64) -> Vec<(f64, f64)> {
	let n = radii.len();
	let mut adjacency = vec![Vec::new(); n];
	for &(a, b) in edges {
		if a < n && b < n && a != b {
			adjacency[a].push(b);
			adjacency[b].push(a);
		}
	}

	let mut level_of = vec![usize::MAX; n];
	let mut levels: Vec<Vec<usize>> = Vec::new();
	let mut order: Vec<usize> = (0..n).collect();
	order.sort_by_key(|&i| std::cmp::Reverse(adjacency[i].len()));

	for &root in &order {
		if level_of[root] != usize::MAX {
			continue;
		}
		let mut queue = VecDeque::from([(root, 0usize)]);
		level_of[root] = 0;
		while let Some((node, depth)) = queue.pop_front() {
			if levels.len() <= depth {
				levels.push(Vec::new());
			}
			levels[depth].push(node);
			for &next in &adjacency[node] {
				if level_of[next] == usize::MAX {
					level_of[next] = depth + 1;
					queue.push_back((next, depth + 1));
				}
			}
		}
	}

	let col = max_diameter(radii) + 40.0;
	let row = max_diameter(radii) + 60.0;
	let mut out = vec![(0.0, 0.0); n];
	for (depth, members) in levels.iter().enumerate() {
		for (slot, &node) in members.iter().enumerate() {
			out[node] = (
				cx + (slot as f64 - (members.len() as f64 - 1.0) / 2.0) * col,
				80.0 + depth as f64 * row,
			);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn distinct(points: &[(f64, f64)]) -> bool {
		for i in 0..points.len() {
			for j in (i + 1)..points.len() {
				let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
				if dx.abs() < 1e-6 && dy.abs() < 1e-6 {
					return false;
				}
			}
		}
		true
	}

	#[test]
	fn layout_names_round_trip() {
		for kind in LayoutKind::ALL {
			assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
		}
		assert!("hexagonal".parse::<LayoutKind>().is_err());
		assert_eq!(LayoutKind::default(), LayoutKind::Grid);
	}

	#[test]
	fn every_layout_positions_every_node() {
		let radii = vec![10.0, 15.0, 20.0, 25.0, 12.0];
		let edges = vec![(0, 1), (1, 2), (3, 4)];
		for kind in LayoutKind::ALL {
			let points = positions(kind, &radii, &edges, W, H);
			assert_eq!(points.len(), radii.len(), "{kind:?}");
			assert!(distinct(&points), "{kind:?} produced overlapping nodes");
		}
		assert!(positions(LayoutKind::Grid, &[], &[], W, H).is_empty());
	}

	#[test]
	fn circle_keeps_nodes_on_one_ring() {
		let radii = vec![10.0; 8];
		let points = positions(LayoutKind::Circle, &radii, &[], W, H);
		let r0 = ((points[0].0 - W / 2.0).powi(2) + (points[0].1 - H / 2.0).powi(2)).sqrt();
		for &(x, y) in &points {
			let r = ((x - W / 2.0).powi(2) + (y - H / 2.0).powi(2)).sqrt();
			assert!((r - r0).abs() < 1e-6);
		}
	}

	#[test]
	fn concentric_puts_the_biggest_node_in_the_center() {
		let radii = vec![10.0, 40.0, 15.0, 20.0];
		let points = positions(LayoutKind::Concentric, &radii, &[], W, H);
		assert_eq!(points[1], (W / 2.0, H / 2.0));
	}

	#[test]
	fn breadthfirst_levels_follow_the_bfs_depth() {
		// 0 is the hub; 1 and 2 hang off it; 3 hangs off 1.
		let radii = vec![10.0; 4];
		let edges = vec![(0, 1), (0, 2), (1, 3)];
		let points = positions(LayoutKind::Breadthfirst, &radii, &edges, W, H);
		assert!(points[0].1 < points[1].1);
		assert_eq!(points[1].1, points[2].1);
		assert!(points[3].1 > points[1].1);
	}
}
