/// A zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u64,
    pub size: u64,
}

impl PageRequest {
    #[must_use]
    pub fn new(index: u64, size: u64) -> Self {
        Self { index, size }
    }

    #[must_use]
    pub fn first(size: u64) -> Self {
        Self::new(0, size)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            ..self
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.index * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(crate::backfill::DEFAULT_PAGE_SIZE)
    }
}

/// One page of a query, with enough of the total to know when to stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_items.div_ceil(request.size)
        };

        Self {
            items,
            request,
            total_items,
            total_pages,
        }
    }

    /// Slices an already ordered collection the way the store would.
    #[must_use]
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.size).unwrap_or(usize::MAX);

        let items = all.into_iter().skip(offset).take(size).collect();

        Self::new(items, request, total_items)
    }

    /// True when no page follows this one, including when this page is past the end.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.request.index + 1 >= self.total_pages
    }
}
