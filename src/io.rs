use crate::hypergraph::Hypergraph;
use crate::tree_decomposition::TreeDecomposition;
use std::convert::TryFrom;
use std::fmt;
use std::io;
use std::io::{BufRead, Write};
use std::str::FromStr;

fn invalid_input(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Parses a `p tw <n> <m>` header into `(n, m)`.
pub fn pace_p(line: &str) -> Result<(usize, usize), io::Error> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("p") || parts.next() != Some("tw") {
        return Err(invalid_input(format!("Invalid header: {}", line)));
    }
    let nums = parts
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid_input(format!("Invalid header: {}", line)))?;
    if nums.len() != 2 {
        return Err(invalid_input(format!("Invalid header: {}", line)));
    }
    Ok((nums[0], nums[1]))
}

/// Parses a line of 1-based vertex ids, each at most `n`.
pub fn pace_vertices(line: &str, n: usize) -> Result<Vec<usize>, io::Error> {
    let vertices = line
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid_input(format!("Invalid line: {}", line)))?;
    if let Some(v) = vertices.iter().find(|v| **v == 0 || **v > n) {
        return Err(invalid_data(format!("Vertex {} out of range 1..={}", v, n)));
    }
    Ok(vertices)
}

/// Shared line loop of both readers. `on_edge` receives the parsed vertices
/// of every edge line and may skip it by doing nothing.
fn read_pace<T, F>(reader: T, mut on_edge: F) -> Result<Hypergraph, io::Error>
where
    T: BufRead,
    F: FnMut(&mut Hypergraph, Vec<usize>) -> Result<(), io::Error>,
{
    let mut graph: Option<Hypergraph> = None;
    let mut expected_edges = 0;
    let mut edges = 0;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        match trimmed.chars().next() {
            None | Some('c') => {}
            Some('p') => {
                if graph.is_some() {
                    return Err(invalid_input("Duplicate header"));
                }
                let (n, m) = pace_p(trimmed)?;
                graph = Some(Hypergraph::new(n));
                expected_edges = m;
            }
            _ => {
                let graph = graph
                    .as_mut()
                    .ok_or_else(|| invalid_input("Edge before header"))?;
                let vertices = pace_vertices(trimmed, graph.num_vertices())?;
                on_edge(graph, vertices)?;
                edges += 1;
            }
        }
    }
    let graph = graph.ok_or_else(|| invalid_input("Missing header"))?;
    if edges != expected_edges {
        return Err(invalid_data(format!(
            "Expected {} edges, found {}",
            expected_edges, edges
        )));
    }
    Ok(graph)
}

/// Reads the PACE `.gr` graph format.
pub struct PaceReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<PaceReader<T>> for Hypergraph {
    type Error = io::Error;

    fn try_from(reader: PaceReader<T>) -> Result<Self, Self::Error> {
        read_pace(reader.0, |graph, vertices| {
            if vertices.len() != 2 {
                return Err(invalid_input(format!(
                    "Expected two vertices per edge, found {}",
                    vertices.len()
                )));
            }
            if vertices[0] != vertices[1] {
                graph
                    .add_edge(&vertices)
                    .map_err(|e| invalid_data(e.to_string()))?;
            }
            Ok(())
        })
    }
}

/// Reads hypergraphs with one hyperedge per line, using the `.gr` header.
pub struct HgrReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<HgrReader<T>> for Hypergraph {
    type Error = io::Error;

    fn try_from(reader: HgrReader<T>) -> Result<Self, Self::Error> {
        read_pace(reader.0, |graph, mut vertices| {
            vertices.sort_unstable();
            vertices.dedup();
            if vertices.len() > 1 {
                graph
                    .add_edge(&vertices)
                    .map_err(|e| invalid_data(e.to_string()))?;
            }
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Gr,
    Hgr,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self::Gr
    }
}

impl InputFormat {
    pub const VARIANTS: &'static [&'static str] = &["gr", "hgr"];

    pub fn read<T: BufRead>(&self, reader: T) -> Result<Hypergraph, io::Error> {
        match self {
            InputFormat::Gr => Hypergraph::try_from(PaceReader(reader)),
            InputFormat::Hgr => Hypergraph::try_from(HgrReader(reader)),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gr" => Ok(InputFormat::Gr),
            "hgr" => Ok(InputFormat::Hgr),
            _ => Err(format!("unknown input format: {}", s)),
        }
    }
}

/// Writes a decomposition in the PACE `.td` format. Node ids and vertex ids
/// are written 1-based regardless of the hypergraph's vertex offset.
pub struct PaceWriter<'a, W: Write> {
    td: &'a TreeDecomposition,
    hypergraph: &'a Hypergraph,
    writer: W,
}

impl<'a, W: Write> PaceWriter<'a, W> {
    pub fn new(td: &'a TreeDecomposition, hypergraph: &'a Hypergraph, writer: W) -> Self {
        Self {
            td,
            hypergraph,
            writer,
        }
    }

    pub fn output(mut self) -> Result<(), io::Error> {
        let offset = self.hypergraph.vertex_offset();
        writeln!(
            self.writer,
            "s td {} {} {}",
            self.td.node_count(),
            self.td.max_bag_size(),
            self.hypergraph.num_vertices()
        )?;
        for bag in self.td.bags() {
            write!(self.writer, "b {}", bag.id() + 1)?;
            for v in bag.sorted_vertices() {
                write!(self.writer, " {}", v - offset + 1)?;
            }
            writeln!(self.writer)?;
        }
        for (parent, child) in self.td.tree_edges() {
            writeln!(self.writer, "{} {}", parent + 1, child + 1)?;
        }
        self.writer.flush()
    }
}

/// Writes the maximum bag size on a single line.
pub struct WidthWriter<'a, W: Write> {
    td: &'a TreeDecomposition,
    writer: W,
}

impl<'a, W: Write> WidthWriter<'a, W> {
    pub fn new(td: &'a TreeDecomposition, writer: W) -> Self {
        Self { td, writer }
    }

    pub fn output(mut self) -> Result<(), io::Error> {
        writeln!(self.writer, "{}", self.td.max_bag_size())?;
        self.writer.flush()
    }
}

/// Writes the tree in pre-order, indenting each node by its depth.
pub struct HumanReadableWriter<'a, W: Write> {
    td: &'a TreeDecomposition,
    writer: W,
}

impl<'a, W: Write> HumanReadableWriter<'a, W> {
    pub fn new(td: &'a TreeDecomposition, writer: W) -> Self {
        Self { td, writer }
    }

    pub fn output(mut self) -> Result<(), io::Error> {
        let mut depth = vec![0; self.td.node_count()];
        for bag in self.td.dfs() {
            if let Some(parent) = bag.parent() {
                depth[bag.id()] = depth[parent] + 1;
            }
            let vertices: Vec<_> = bag
                .sorted_vertices()
                .iter()
                .map(|v| v.to_string())
                .collect();
            writeln!(
                self.writer,
                "{:indent$}NODE {}: [ {} ]",
                "",
                bag.id() + 1,
                vertices.join(", "),
                indent = 2 * depth[bag.id()]
            )?;
        }
        self.writer.flush()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Td,
    Width,
    Human,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Td
    }
}

impl OutputFormat {
    pub const VARIANTS: &'static [&'static str] = &["td", "width", "human"];

    pub fn write<W: Write>(
        &self,
        td: &TreeDecomposition,
        hypergraph: &Hypergraph,
        writer: W,
    ) -> Result<(), io::Error> {
        match self {
            OutputFormat::Td => PaceWriter::new(td, hypergraph, writer).output(),
            OutputFormat::Width => WidthWriter::new(td, writer).output(),
            OutputFormat::Human => HumanReadableWriter::new(td, writer).output(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Td => "td",
            OutputFormat::Width => "width",
            OutputFormat::Human => "human",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "td" => Ok(OutputFormat::Td),
            "width" => Ok(OutputFormat::Width),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bucket_elimination::BucketEliminationDecomposer;
    use crate::heuristic_elimination_order::NaturalOrdering;
    use crate::hypergraph::Hypergraph;
    use crate::io::{HgrReader, InputFormat, OutputFormat, PaceReader, PaceWriter};
    use std::convert::TryFrom;
    use std::io;

    const PATH_GR: &str = "c a path with an isolated vertex\np tw 4 2\n1 2\n2 3\n";

    #[test]
    fn read_gr() {
        let graph = Hypergraph::try_from(PaceReader(PATH_GR.as_bytes())).unwrap();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.neighbors(2).unwrap(), vec![1, 3]);
        assert_eq!(graph.isolated_vertices(), vec![4]);
    }

    #[test]
    fn gr_skips_self_loops() {
        let input = "p tw 3 2\n1 1\n\n2 3\n";
        let graph = Hypergraph::try_from(PaceReader(input.as_bytes())).unwrap();
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn read_hgr() {
        let input = "p tw 5 3\nc hyperedges\n1 2 3\n3 4 5\n4\n";
        let graph = InputFormat::Hgr.read(input.as_bytes()).unwrap();
        assert_eq!(graph.num_vertices(), 5);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.hyperedge(1).unwrap().vertices(), &[3, 4, 5]);
    }

    #[test]
    fn reject_malformed_input() {
        let cases = [
            ("p td 3 1\n1 2\n", io::ErrorKind::InvalidInput),
            ("p tw 3\n1 2\n", io::ErrorKind::InvalidInput),
            ("1 2\np tw 3 1\n", io::ErrorKind::InvalidInput),
            ("p tw 3 1\n1 x\n", io::ErrorKind::InvalidInput),
            ("p tw 3 1\n1 2 3\n", io::ErrorKind::InvalidInput),
            ("p tw 3 1\n1 4\n", io::ErrorKind::InvalidData),
            ("p tw 3 1\n0 1\n", io::ErrorKind::InvalidData),
            ("p tw 3 2\n1 2\n", io::ErrorKind::InvalidData),
            ("c only comments\n", io::ErrorKind::InvalidInput),
        ];
        for (input, kind) in cases.iter() {
            let err = Hypergraph::try_from(PaceReader(input.as_bytes())).unwrap_err();
            assert_eq!(err.kind(), *kind, "{:?}", input);
        }

        let err = Hypergraph::try_from(HgrReader("p tw 2 1\n1 2 3\n".as_bytes())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn write_td() {
        let graph = Hypergraph::try_from(PaceReader(PATH_GR.as_bytes())).unwrap();
        let td = BucketEliminationDecomposer::new(NaturalOrdering)
            .compress(false)
            .decompose(&graph)
            .unwrap();

        let mut buf = vec![];
        PaceWriter::new(&td, &graph, &mut buf).output().unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "s td 4 2 4");
        assert_eq!(lines[1], "b 1 4");
        assert_eq!(lines.len(), 1 + 4 + 3);
        assert!(lines[1..5].iter().all(|l| l.starts_with("b ")));
        assert!(lines.contains(&"b 2 3"));
        assert!(lines.contains(&"b 4 1 2"));
    }

    #[test]
    fn write_td_with_zero_offset() {
        let mut graph = Hypergraph::with_offset(2, 0);
        graph.add_edge(&[0, 1]).unwrap();
        let td = BucketEliminationDecomposer::new(NaturalOrdering)
            .decompose(&graph)
            .unwrap();

        let mut buf = vec![];
        OutputFormat::Td.write(&td, &graph, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "s td 1 2 2\nb 1 1 2\n");
    }

    #[test]
    fn write_width_and_human() {
        let graph = Hypergraph::try_from(PaceReader(PATH_GR.as_bytes())).unwrap();
        let td = BucketEliminationDecomposer::new(NaturalOrdering)
            .compress(false)
            .decompose(&graph)
            .unwrap();

        let mut buf = vec![];
        OutputFormat::Width.write(&td, &graph, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2\n");

        let mut buf = vec![];
        OutputFormat::Human.write(&td, &graph, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "NODE 1: [ 4 ]");
        assert_eq!(lines[1], "  NODE 2: [ 3 ]");
        assert_eq!(lines[2], "    NODE 3: [ 2, 3 ]");
        assert_eq!(lines[3], "      NODE 4: [ 1, 2 ]");
    }

    #[test]
    fn format_names() {
        assert_eq!("hgr".parse::<InputFormat>(), Ok(InputFormat::Hgr));
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("lp".parse::<InputFormat>().is_err());
        assert_eq!(OutputFormat::Width.to_string(), "width");
    }
}
