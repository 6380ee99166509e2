use std::collections::HashMap;

use crate::error::CodegenError;
use crate::schema::SchemaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency edges between catalog types, by index into the input slice.
///
/// A composite depends on the type of each of its attributes, and an array type depends on
/// its element type. Self-references and references to types outside the input are dropped.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    types: &'a [SchemaType],
    edges: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(types: &'a [SchemaType]) -> Self {
        let mut index_by_id: HashMap<i64, usize> = HashMap::new();
        let mut index_by_name: HashMap<&str, usize> = HashMap::new();
        for (i, ty) in types.iter().enumerate() {
            index_by_id.entry(ty.id).or_insert(i);
            index_by_name.entry(ty.name.as_str()).or_insert(i);
        }

        let edges = types
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                let mut deps: Vec<usize> = ty
                    .attributes
                    .iter()
                    .filter(|attr| attr.type_id != ty.id)
                    .filter_map(|attr| index_by_id.get(&attr.type_id).copied())
                    .collect();
                if let Some(base) = ty.array_base().and_then(|b| index_by_name.get(b)) {
                    deps.push(*base);
                }
                deps.retain(|&d| d != i);
                deps
            })
            .collect();

        Self { types, edges }
    }

    /// Depth-first postorder over all types, visiting roots in input order.
    pub fn topological_order(&self) -> Result<Vec<usize>, CodegenError> {
        let mut marks = vec![Mark::Unvisited; self.types.len()];
        let mut order = Vec::with_capacity(self.types.len());
        for i in 0..self.types.len() {
            self.visit(i, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    /// True if some non-array type has `node` as an attribute type.
    fn is_attribute_dependency(&self, node: usize) -> bool {
        self.edges
            .iter()
            .enumerate()
            .any(|(i, deps)| !self.types[i].is_array() && deps.contains(&node))
    }

    fn visit(
        &self,
        node: usize,
        marks: &mut [Mark],
        order: &mut Vec<usize>,
    ) -> Result<(), CodegenError> {
        match marks[node] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(CodegenError::CircularDependency(
                    self.types[node].name.clone(),
                ))
            }
            Mark::Unvisited => {}
        }
        marks[node] = Mark::InProgress;
        for &dep in &self.edges[node] {
            self.visit(dep, marks, order)?;
        }
        marks[node] = Mark::Done;
        order.push(node);
        Ok(())
    }
}

/// Order types so every type comes after the types it references, with array types grouped
/// at the end (still in dependency order among themselves).
///
/// An array type used as a composite attribute stays in place, since moving it would put it
/// after the composite that needs it.
pub fn sort_types(types: &[SchemaType]) -> Result<Vec<SchemaType>, CodegenError> {
    let graph = DependencyGraph::build(types);
    let order = graph.topological_order()?;
    let (plain, arrays): (Vec<usize>, Vec<usize>) = order
        .into_iter()
        .partition(|&i| !types[i].is_array() || graph.is_attribute_dependency(i));
    Ok(plain
        .into_iter()
        .chain(arrays)
        .map(|i| types[i].clone())
        .collect())
}
