use serde::Deserialize;

/// Identity of an installed exercise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub language: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
        }
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Lowercase the name and replace spaces with underscores.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_replaces_spaces() {
        assert_eq!(slugify("Linked List"), "linked_list");
        assert_eq!(slugify("HTTP  Server"), "http__server");
        assert_eq!(slugify("already_slugged"), "already_slugged");
    }

    #[test]
    fn project_slug_uses_name() {
        let project = Project::new("p-1", "Binary Search Tree", "go");
        assert_eq!(project.slug(), "binary_search_tree");
    }
}
