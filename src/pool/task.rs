/// Error type returned by a failing [`Task`].
pub type TaskError = Box<dyn ::std::error::Error + Send + Sync + 'static>;

/// One unit of work: consume an input, push zero or more outputs.
///
/// `out` is cleared by the worker after every call, so a task never sees
/// outputs left over from a previous item.
pub trait Task<In, Out> {
    fn process(&self, input: In, out: &mut Vec<Out>) -> Result<(), TaskError>;
}

impl<In, Out, F> Task<In, Out> for F
where F: Fn(In, &mut Vec<Out>) -> Result<(), TaskError>,
{
    fn process(&self, input: In, out: &mut Vec<Out>) -> Result<(), TaskError>
    { self(input, out) }
}

/// A task that emits exactly one output per input and never fails.
///
/// Constructed with [`map`].
#[derive(Debug, Clone, Copy)]
pub struct Map<F>(F);

pub fn map<F>(f: F) -> Map<F> { Map(f) }

impl<In, Out, F> Task<In, Out> for Map<F>
where F: Fn(In) -> Out,
{
    fn process(&self, input: In, out: &mut Vec<Out>) -> Result<(), TaskError> {
        out.push((self.0)(input));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_tasks() {
        let task = |x: i32, out: &mut Vec<i32>| -> Result<(), TaskError> {
            out.extend(&[x, -x]);
            Ok(())
        };
        let mut out = vec![];
        task.process(3, &mut out).unwrap();
        assert_eq!(out, vec![3, -3]);
    }

    #[test]
    fn map_emits_one_output() {
        let mut out = vec![];
        map(|x: i32| x * 10).process(4, &mut out).unwrap();
        assert_eq!(out, vec![40]);
    }

    #[test]
    fn task_errors_are_boxed() {
        let task = |x: i32, _: &mut Vec<()>| -> Result<(), TaskError> {
            match x {
                0 => Err("zero is not allowed".into()),
                _ => Ok(()),
            }
        };
        let err = task.process(0, &mut vec![]).unwrap_err();
        assert_eq!(err.to_string(), "zero is not allowed");
    }
}
