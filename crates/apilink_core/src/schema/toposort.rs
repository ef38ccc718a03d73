use crate::schema::{Category, TypeId, TypeNode};

/// Order structures so every structure-typed member precedes its owner.
///
/// Each structure gets the depth of its member DAG (0 without structure
/// members, otherwise one more than its deepest structure member) and the list
/// is stable-sorted by that depth, so equal-depth structures keep input order.
pub fn sort_structures(nodes: &[TypeNode], structures: &[TypeId]) -> Vec<TypeId> {
	let mut depths: Vec<Option<usize>> = vec![None; nodes.len()];
	for &id in structures {
		depth_of(nodes, id, &mut depths);
	}

	let mut sorted = structures.to_vec();
	sorted.sort_by_key(|id| depths[id.index()].unwrap_or(0));
	sorted
}

fn depth_of(nodes: &[TypeNode], id: TypeId, depths: &mut [Option<usize>]) -> usize {
	if let Some(depth) = depths[id.index()] {
		return depth;
	}

	let mut depth = 0;
	if let Some(structure) = nodes[id.index()].as_structure() {
		for member in &structure.members {
			if nodes[member.ty.index()].category() == Category::Structure {
				depth = depth.max(depth_of(nodes, member.ty, depths) + 1);
			}
		}
	}

	depths[id.index()] = Some(depth);
	depth
}

#[cfg(test)]
mod tests {
	use super::sort_structures;
	use crate::schema::{Extensibility, Name, RecordMember, StructureType, TypeId, TypeKind, TypeNode};

	fn native(name: &str) -> TypeNode {
		TypeNode {
			name: Name::native(name),
			kind: TypeKind::Native,
			may_have_handle: false,
			wire_transparent: true,
		}
	}

	fn structure(name: &str, member_types: &[u32]) -> TypeNode {
		TypeNode {
			name: Name::new(name),
			kind: TypeKind::Structure(StructureType {
				members: member_types
					.iter()
					.enumerate()
					.map(|(idx, ty)| RecordMember::value(Name::new(&format!("m{idx}")), TypeId(*ty)))
					.collect(),
				extensibility: Extensibility::None,
				chain_roots: Vec::new(),
				extensions: Vec::new(),
			}),
			may_have_handle: false,
			wire_transparent: false,
		}
	}

	#[test]
	fn member_structure_is_moved_before_owner() {
		let nodes = vec![native("uint32_t"), structure("a", &[2]), structure("b", &[0])];
		let sorted = sort_structures(&nodes, &[TypeId(1), TypeId(2)]);
		assert_eq!(sorted, vec![TypeId(2), TypeId(1)]);
	}

	#[test]
	fn equal_depth_keeps_input_order() {
		let nodes = vec![
			native("uint32_t"),
			structure("c", &[0]),
			structure("a", &[0]),
			structure("b", &[0]),
			structure("outer", &[1, 3]),
		];
		let input = [TypeId(4), TypeId(1), TypeId(2), TypeId(3)];
		let sorted = sort_structures(&nodes, &input);
		assert_eq!(sorted, vec![TypeId(1), TypeId(2), TypeId(3), TypeId(4)]);
	}

	#[test]
	fn deep_chain_is_fully_ordered() {
		let nodes = vec![
			native("float"),
			structure("level3", &[2]),
			structure("level2", &[3]),
			structure("level1", &[4]),
			structure("level0", &[0, 0]),
		];
		let sorted = sort_structures(&nodes, &[TypeId(1), TypeId(2), TypeId(3), TypeId(4)]);
		assert_eq!(sorted, vec![TypeId(4), TypeId(3), TypeId(2), TypeId(1)]);

		for (position, id) in sorted.iter().enumerate() {
			let members = &nodes[id.index()].as_structure().expect("structure").members;
			for member in members {
				if let Some(member_pos) = sorted.iter().position(|item| *item == member.ty) {
					assert!(member_pos < position, "member type must precede owner");
				}
			}
		}
	}
}
